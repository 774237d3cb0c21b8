use super::*;

/// Tree maintenance: plain binary search tree keyed by beach line position,
/// plus the in-order threading through `prev`/`next`.
impl BeachLine {
    /// Leftmost arc of the subtree rooted at `node`
    pub(super) fn leftmost(&self, mut node: ArcId) -> ArcId {
        while let Some(left) = self.arcs[node.0].left {
            node = left;
        }
        node
    }

    /// Leftmost arc of the whole beach line
    pub fn first(&self) -> Option<ArcId> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Insert a new arc for `site` right after `after`, or as the leftmost arc when
    /// `after` is `None`.
    pub fn insert_successor(&mut self, after: Option<ArcId>, site: SiteId) -> ArcId {
        let id = ArcId(self.arcs.len());
        self.arcs.push(Arc::new(site));
        self.len += 1;

        match after {
            Some(node) => {
                let next = self.arcs[node.0].next;
                self.arcs[id.0].prev = Some(node);
                self.arcs[id.0].next = next;
                if let Some(next) = next {
                    self.arcs[next.0].prev = Some(id);
                }
                self.arcs[node.0].next = Some(id);

                // successor goes into the leftmost slot of the right subtree
                match self.arcs[node.0].right {
                    Some(right) => {
                        let parent = self.leftmost(right);
                        self.arcs[parent.0].left = Some(id);
                        self.arcs[id.0].parent = Some(parent);
                    }
                    None => {
                        self.arcs[node.0].right = Some(id);
                        self.arcs[id.0].parent = Some(node);
                    }
                }
            }
            None => match self.root {
                Some(root) => {
                    let first = self.leftmost(root);
                    self.arcs[id.0].next = Some(first);
                    self.arcs[first.0].prev = Some(id);
                    self.arcs[first.0].left = Some(id);
                    self.arcs[id.0].parent = Some(first);
                }
                None => {
                    self.root = Some(id);
                }
            },
        }

        id
    }

    /// Remove `arc` from the tree and the threading.
    ///
    /// Two children: the in-order successor takes the removed arc's place.
    pub fn remove(&mut self, arc: ArcId) {
        debug_assert!(self.arcs[arc.0].alive, "removing a dead arc");

        let Arc {
            prev,
            next,
            left,
            right,
            ..
        } = self.arcs[arc.0];
        if let Some(prev) = prev {
            self.arcs[prev.0].next = next;
        }
        if let Some(next) = next {
            self.arcs[next.0].prev = prev;
        }

        match (left, right) {
            (None, None) => self.transplant(arc, None),
            (Some(child), None) | (None, Some(child)) => self.transplant(arc, Some(child)),
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                if successor != right {
                    let successor_right = self.arcs[successor.0].right;
                    self.transplant(successor, successor_right);
                    self.arcs[successor.0].right = Some(right);
                    self.arcs[right.0].parent = Some(successor);
                }
                self.transplant(arc, Some(successor));
                self.arcs[successor.0].left = Some(left);
                self.arcs[left.0].parent = Some(successor);
            }
        }

        let removed = &mut self.arcs[arc.0];
        removed.alive = false;
        removed.parent = None;
        removed.left = None;
        removed.right = None;
        removed.prev = None;
        removed.next = None;
        removed.circle_event = None;
        self.len -= 1;
    }

    /// Put the subtree `with` where `node` hangs
    fn transplant(&mut self, node: ArcId, with: Option<ArcId>) {
        let parent = self.arcs[node.0].parent;
        match parent {
            None => self.root = with,
            Some(parent) => {
                if self.arcs[parent.0].left == Some(node) {
                    self.arcs[parent.0].left = with;
                } else {
                    self.arcs[parent.0].right = with;
                }
            }
        }
        if let Some(with) = with {
            self.arcs[with.0].parent = parent;
        }
    }

    /// tree depth, for diagnostics
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![];
        stack.extend(self.root.map(|root| (root, 1)));
        while let Some((node, level)) = stack.pop() {
            depth = depth.max(level);
            let arc = &self.arcs[node.0];
            stack.extend(arc.left.map(|left| (left, level + 1)));
            stack.extend(arc.right.map(|right| (right, level + 1)));
        }
        depth
    }
}
