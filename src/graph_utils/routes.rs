use super::graph::{NodeId, NodePair};

/// Node pairs flagged as routes to find.
///
/// A mark says nothing about connectivity: the two nodes need not share an
/// edge. Marks keep insertion order, which is also their export order.
#[derive(Clone, Debug, Default)]
pub struct RouteMarks {
    pairs: Vec<NodePair>,
}

impl RouteMarks {
    pub(crate) fn push(&mut self, start: NodeId, end: NodeId) {
        self.pairs.push((start, end));
    }

    pub(crate) fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn len(&self) -> usize { self.pairs.len() }
    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &NodePair> { self.pairs.iter() }
    pub fn as_slice(&self) -> &[NodePair] { &self.pairs }
}
