use crate::{BoundingBox, Error, Point, SweeperBuilder};

#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("line {line} can not be parsed: {content:?}")]
    Parse { line: usize, content: String },
    #[error("invalid input")]
    Invalid(#[from] Error),
}

/// Loader loads source to a [`SweeperBuilder`].
/// e.g: PlainFileLoader load from a file with one site per line
pub trait Loader {
    fn load(&mut self, source: &str) -> Result<SweeperBuilder, LoaderError>;
}

/// Loaders can load data from file
///
/// Format, one entry per line:
/// ```text
/// # comment
/// BBOX 0 100 0 100
/// 10 30
/// 25.5 55
/// ```
/// `BBOX` takes `xl xr yb yt`, without it the box is derived from the sites.
#[derive(Default)]
pub struct PlainFileLoader {}

impl Loader for PlainFileLoader {
    fn load(&mut self, path: &str) -> Result<SweeperBuilder, LoaderError> {
        let value = std::fs::read_to_string(path)?;
        parse(&value)
    }
}

/// Parse the [`PlainFileLoader`] format from a string
pub fn parse(value: &str) -> Result<SweeperBuilder, LoaderError> {
    let mut builder = SweeperBuilder::default();

    for (idx, line) in value.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_error = || LoaderError::Parse {
            line: idx + 1,
            content: line.to_string(),
        };

        if let Some(rest) = line.strip_prefix("BBOX") {
            let [xl, xr, yb, yt] = parse_numbers::<4>(rest).ok_or_else(parse_error)?;
            let bbox = BoundingBox::new(xl, xr, yb, yt);
            if !bbox.is_valid() {
                return Err(Error::InvalidBoundingBox { xl, xr, yb, yt }.into());
            }
            builder = builder.bounding_box(bbox);
            continue;
        }

        let [x, y] = parse_numbers::<2>(line).ok_or_else(parse_error)?;
        builder = builder.add_site(Point::new(x, y));
    }

    Ok(builder)
}

/// exactly `N` whitespace separated numbers
fn parse_numbers<const N: usize>(line: &str) -> Option<[f64; N]> {
    let mut result = [0.; N];
    let mut iter = line.split_whitespace();
    for slot in result.iter_mut() {
        *slot = iter.next()?.parse::<f64>().ok()?;
    }
    if iter.next().is_some() {
        return None;
    }
    Some(result)
}
