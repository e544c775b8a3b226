//! Line-oriented text exchange.
//!
//! # Graph format
//!
//! ```text
//! NODE <id> <description...>
//! TIME <id> <d1> <d2> ...
//! EDGE <from> <to> <cost>
//! ```
//!
//! Lines are whitespace-separated. Unknown line types and blank lines are
//! ignored; malformed `EDGE` and `TIME` lines are skipped with a trace.
//!
//! # Schedule format
//!
//! One `NODE <id>` line per scheduled node, in schedule order.

mod schedule;
mod text;

pub use schedule::{schedule_to_text, write_schedule};
pub use text::{graph_to_text, parse_graph, read_graph, write_graph};
