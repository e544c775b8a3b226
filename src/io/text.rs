//! Graph import and export.

use std::collections::HashMap;
use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{node_key, Graph, Node};

/// Parses a graph from text.
///
/// Nodes are added first, then `TIME` vectors are attached, then edges are
/// added in file order, so an edge may precede the nodes it references.
/// Edges with an unknown endpoint are kept dangling (with a warning).
pub fn parse_graph(input: &str) -> Graph {
    let mut nodes: Vec<Node> = Vec::new();
    let mut times: HashMap<String, Vec<f64>> = HashMap::new();
    let mut edges: Vec<(String, String, f64)> = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(kind) = tokens.next() else {
            continue;
        };

        match kind.to_ascii_uppercase().as_str() {
            "NODE" => {
                let Some(id) = tokens.next() else {
                    debug!(line = line_no + 1, "NODE without id skipped");
                    continue;
                };
                let description = tokens.collect::<Vec<_>>().join(" ");
                nodes.push(Node::new(id).with_description(description));
            }
            "EDGE" => {
                let (Some(from), Some(to), Some(cost)) = (tokens.next(), tokens.next(), tokens.next())
                else {
                    debug!(line = line_no + 1, "incomplete EDGE skipped");
                    continue;
                };
                match cost.parse::<f64>() {
                    Ok(cost) if cost.is_finite() => edges.push((from.to_string(), to.to_string(), cost)),
                    _ => debug!(line = line_no + 1, cost, "EDGE with malformed cost skipped"),
                }
            }
            "TIME" => {
                let Some(id) = tokens.next() else {
                    debug!(line = line_no + 1, "TIME without id skipped");
                    continue;
                };
                let parsed: std::result::Result<Vec<f64>, _> = tokens.map(str::parse::<f64>).collect();
                match parsed {
                    Ok(values) if values.iter().all(|v| v.is_finite()) => {
                        times.insert(node_key(id), values);
                    }
                    _ => debug!(line = line_no + 1, id, "TIME with malformed values skipped"),
                }
            }
            _ => {}
        }
    }

    let mut graph = Graph::new();
    for mut node in nodes {
        if let Some(durations) = times.remove(&node.key()) {
            node = node.with_durations(durations);
        }
        let id = node.id.clone();
        if !graph.add_node(node) {
            warn!(node = %id, "duplicate NODE ignored");
        }
    }
    for key in times.keys() {
        warn!(node = %key, "TIME for unknown node ignored");
    }
    for (from, to, cost) in edges {
        graph.add_edge_allow_dangling(&from, &to, cost);
    }
    graph
}

/// Reads a graph from a reader until end of input.
///
/// # Errors
/// [`crate::SchedError::Io`] if reading fails.
pub fn read_graph<R: Read>(mut reader: R) -> Result<Graph> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(parse_graph(&input))
}

/// Writes a graph in the text format.
pub fn write_graph<W: Write>(graph: &Graph, mut writer: W) -> Result<()> {
    writer.write_all(graph_to_text(graph).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Renders a graph as text: all `NODE` lines, then `TIME` lines, then
/// `EDGE` lines.
pub fn graph_to_text(graph: &Graph) -> String {
    let mut out = String::new();
    for node in graph.nodes() {
        if node.description.is_empty() {
            out.push_str(&format!("NODE {}\n", node.id));
        } else {
            out.push_str(&format!("NODE {} {}\n", node.id, node.description));
        }
    }
    for node in graph.nodes().iter().filter(|n| !n.durations.is_empty()) {
        let values: Vec<String> = node.durations.iter().map(f64::to_string).collect();
        out.push_str(&format!("TIME {} {}\n", node.id, values.join(" ")));
    }
    for edge in graph.edges() {
        out.push_str(&format!("EDGE {} {} {}\n", edge.from, edge.to, edge.cost));
    }
    out
}
