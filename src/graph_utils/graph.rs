use std::collections::BTreeMap;

use rand::Rng;

use super::routes::RouteMarks;

// Basic type aliases for clarity
pub type NodeId = usize;
pub type NodePair = (NodeId, NodeId);
type Distance = f64;

// Node widgets are fixed 30x30 squares anchored at their top-left corner
pub const NODE_SIZE: i32 = 30;
pub const NODE_HALF_SIZE: i32 = NODE_SIZE / 2;

/// Display colour shared by both ends of a route mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl MarkerColor {
    // Keep channels bright enough that the black node label stays readable
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            r: rng.random_range(100..255),
            g: rng.random_range(100..255),
            b: rng.random_range(100..255),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub x: i32,
    pub y: i32,
    pub connections: BTreeMap<NodeId, Distance>,
    pub marker: Option<MarkerColor>,
}

impl Node {
    fn new(id: NodeId, x: i32, y: i32) -> Self {
        Node { id, x, y, connections: BTreeMap::new(), marker: None }
    }

    pub fn distance_to(&self, other: &Node) -> Distance {
        // Any two i32 coordinates can be further apart than i32::MAX
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Centre of the node widget, which is what the text format stores.
    ///
    /// Widened to `i64` so nodes at the edge of the `i32` range still have one.
    pub fn center(&self) -> (i64, i64) {
        let half = i64::from(NODE_HALF_SIZE);
        (i64::from(self.x) + half, i64::from(self.y) + half)
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        let (x, y, size) = (i64::from(self.x), i64::from(self.y), i64::from(NODE_SIZE));
        let (px, py) = (i64::from(px), i64::from(py));
        px >= x && px < x + size && py >= y && py < y + size
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connections.contains_key(&other)
    }
}

/// Owner of every node, edge and route mark of one editing session.
///
/// Nodes live in an arena indexed by their id: ids are handed out from zero
/// in creation order and nodes are only ever removed all at once by
/// [`GraphRegistry::clear`], so `nodes[id].id == id` always holds.
#[derive(Clone, Debug, Default)]
pub struct GraphRegistry {
    nodes: Vec<Node>,
    edges: Vec<NodePair>,
    pub(crate) routes: RouteMarks,
    pub(crate) selected: Option<NodeId>,
    pub(crate) route_start: Option<NodeId>,
}

impl GraphRegistry {
    // Instantiate a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // Place a node and return its new ID
    pub fn create_node(&mut self, x: i32, y: i32) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, x, y));
        id
    }

    /// Connect two nodes with an edge weighted by their Euclidean distance.
    ///
    /// Both sides are checked before anything is written, so either both
    /// adjacency entries and the edge record are committed or nothing is.
    /// Returns `false` for unknown ids, self-loops and already connected pairs.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let (Some(na), Some(nb)) = (self.nodes.get(a), self.nodes.get(b)) else {
            return false;
        };
        if na.is_connected_to(b) || nb.is_connected_to(a) {
            return false;
        }
        let dist = na.distance_to(nb);
        self.nodes[a].connections.insert(b, dist);
        self.nodes[b].connections.insert(a, dist);
        self.edges.push((a, b));
        true
    }

    // Remove an edge from both endpoints and drop its record; all or nothing
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        let (Some(na), Some(nb)) = (self.nodes.get(a), self.nodes.get(b)) else {
            return false;
        };
        if !na.is_connected_to(b) || !nb.is_connected_to(a) {
            return false;
        }
        self.nodes[a].connections.remove(&b);
        self.nodes[b].connections.remove(&a);
        self.edges
            .retain(|&(x, y)| !((x == a && y == b) || (x == b && y == a)));
        true
    }

    /// Drop every node, edge and route mark and reset id assignment.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.routes.clear();
        self.selected = None;
        self.route_start = None;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> { self.nodes.get(id) }
    pub fn nodes(&self) -> &[Node] { &self.nodes }
    pub fn edges(&self) -> &[NodePair] { &self.edges }
    pub fn routes(&self) -> &RouteMarks { &self.routes }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn selected(&self) -> Option<NodeId> { self.selected }
    pub fn route_start(&self) -> Option<NodeId> { self.route_start }

    // Weight of the edge between a and b, if they are connected
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.nodes.get(a)?.connections.get(&b).copied()
    }

    // Topmost node under a point; later nodes are drawn above earlier ones
    pub fn node_at(&self, x: i32, y: i32) -> Option<NodeId> {
        self.nodes.iter().rev().find(|n| n.contains_point(x, y)).map(|n| n.id)
    }

    pub(crate) fn set_marker(&mut self, id: NodeId, color: MarkerColor) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.marker = Some(color);
        }
    }
}
