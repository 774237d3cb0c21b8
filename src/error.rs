/// Input rejected before the sweep starts
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("at least 2 distinct sites are required, got {count}")]
    TooFewSites { count: usize },
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },
    #[error("invalid bounding box xl={xl} xr={xr} yb={yb} yt={yt}")]
    InvalidBoundingBox { xl: f64, xr: f64, yb: f64, yt: f64 },
    #[error("site {index} lies outside the bounding box")]
    SiteOutsideBoundingBox { index: usize },
}
