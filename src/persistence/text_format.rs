//! Flat text format for a whole editing session.
//!
//! ```text
//! <route mark count>
//! <node count>
//! <edge count>
//!
//! <first id>\t<second id>      one line per route mark
//!
//! <centre x>\t<centre y>       one line per node, in creation order
//!
//! <first id>\t<second id>      one line per edge, in connection order
//!
//! ```
//!
//! Ids are positions in the node section (0-based). Every section ends with a
//! blank line; on import the edge section may also run to end of input, which
//! is how older files were written.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use log::{info, warn};
use thiserror::Error;

use crate::graph_utils::graph::{GraphRegistry, MarkerColor, NodeId, NODE_HALF_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Header,
    RouteMarks,
    Nodes,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::RouteMarks => "route mark",
            Section::Nodes => "node",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("input ended inside the {section} section")]
    Truncated { section: Section },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("line {line}: no node with id {id}")]
    UnknownNode { line: usize, id: NodeId },
    #[error("line {line}: cannot connect node {first} to node {second}")]
    RejectedEdge { line: usize, first: NodeId, second: NodeId },
    #[error("line {line}: route mark pairs node {id} with itself")]
    DegenerateRoute { line: usize, id: NodeId },
    #[error("line {line}: unexpected content after the edge section")]
    TrailingContent { line: usize },
}

/// Render the registry in the flat text format. Pure and infallible.
pub fn export(graph: &GraphRegistry) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", graph.routes().len());
    let _ = writeln!(out, "{}", graph.node_count());
    let _ = writeln!(out, "{}", graph.edge_count());
    out.push('\n');

    for (a, b) in graph.routes().iter() {
        let _ = writeln!(out, "{}\t{}", a, b);
    }
    out.push('\n');

    for node in graph.nodes() {
        let (cx, cy) = node.center();
        let _ = writeln!(out, "{}\t{}", cx, cy);
    }
    out.push('\n');

    for (a, b) in graph.edges() {
        let _ = writeln!(out, "{}\t{}", a, b);
    }
    out.push('\n');
    out
}

/// Replace the registry contents with the graph described by `text`.
///
/// The registry is cleared before parsing starts. On any error it is cleared
/// again, so a failed import always leaves an empty graph behind.
pub fn import(graph: &mut GraphRegistry, text: &str) -> Result<(), ImportError> {
    graph.clear();
    match populate(graph, text) {
        Ok(declared) => {
            let actual = [graph.routes().len(), graph.node_count(), graph.edge_count()];
            if declared.iter().zip(actual).any(|(d, a)| *d != Some(a)) {
                warn!("header counts {:?} do not match content {:?}", declared, actual);
            }
            info!(
                "imported {} nodes, {} edges, {} route marks",
                actual[1], actual[2], actual[0]
            );
            Ok(())
        }
        Err(e) => {
            graph.clear();
            warn!("import failed: {}", e);
            Err(e)
        }
    }
}

fn populate(graph: &mut GraphRegistry, text: &str) -> Result<[Option<usize>; 3], ImportError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    // Counts are informational only
    let mut declared = [None; 3];
    for slot in declared.iter_mut() {
        let (_, line) = lines.next().ok_or(ImportError::Truncated { section: Section::Header })?;
        *slot = line.trim().parse::<usize>().ok();
    }
    // Separator after the counts; its content is ignored
    lines.next().ok_or(ImportError::Truncated { section: Section::Header })?;

    let mut pending_routes = Vec::new();
    for (line_no, line) in read_section(&mut lines, Section::RouteMarks)? {
        let (a, b) = parse_pair::<NodeId>(line_no, line)?;
        pending_routes.push((line_no, a, b));
    }

    for (line_no, line) in read_section(&mut lines, Section::Nodes)? {
        let (cx, cy) = parse_pair::<i64>(line_no, line)?;
        let to_corner = |c: i64| {
            c.checked_sub(i64::from(NODE_HALF_SIZE)).and_then(|v| i32::try_from(v).ok())
        };
        let (Some(x), Some(y)) = (to_corner(cx), to_corner(cy)) else {
            return Err(ImportError::Malformed {
                line: line_no,
                reason: format!("coordinate ({}, {}) out of range", cx, cy),
            });
        };
        graph.create_node(x, y);
    }

    for (line_no, line) in lines.by_ref() {
        if is_blank(line) {
            break;
        }
        let (a, b) = parse_pair::<NodeId>(line_no, line)?;
        resolve(graph, line_no, a)?;
        resolve(graph, line_no, b)?;
        if !graph.connect(a, b) {
            return Err(ImportError::RejectedEdge { line: line_no, first: a, second: b });
        }
    }
    if let Some((line_no, _)) = lines.find(|(_, l)| !is_blank(l)) {
        return Err(ImportError::TrailingContent { line: line_no });
    }

    for (line_no, a, b) in pending_routes {
        resolve(graph, line_no, a)?;
        resolve(graph, line_no, b)?;
        if a == b {
            return Err(ImportError::DegenerateRoute { line: line_no, id: a });
        }
        let color = MarkerColor::random();
        graph.set_marker(a, color);
        graph.set_marker(b, color);
        graph.routes.push(a, b);
    }

    Ok(declared)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// Collect lines up to (not including) the next blank line
fn read_section<'a, I>(lines: &mut I, section: Section) -> Result<Vec<(usize, &'a str)>, ImportError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut out = Vec::new();
    loop {
        match lines.next() {
            None => return Err(ImportError::Truncated { section }),
            Some((_, line)) if is_blank(line) => return Ok(out),
            Some(entry) => out.push(entry),
        }
    }
}

fn parse_pair<T: FromStr>(line: usize, text: &str) -> Result<(T, T), ImportError> {
    let mut fields = text.split('\t').map(str::trim);
    let (Some(first), Some(second), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ImportError::Malformed {
            line,
            reason: "expected two tab-separated fields".to_string(),
        });
    };
    let parse = |field: &str| {
        field.parse::<T>().map_err(|_| ImportError::Malformed {
            line,
            reason: format!("invalid number {:?}", field),
        })
    };
    Ok((parse(first)?, parse(second)?))
}

fn resolve(graph: &GraphRegistry, line: usize, id: NodeId) -> Result<NodeId, ImportError> {
    graph.node(id).map(|n| n.id).ok_or(ImportError::UnknownNode { line, id })
}
