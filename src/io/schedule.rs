//! Schedule writer.

use std::io::Write;

use crate::error::Result;
use crate::models::Schedule;

/// Writes one `NODE <id>` line per scheduled node.
pub fn write_schedule<W: Write>(schedule: &Schedule, mut writer: W) -> Result<()> {
    for node in &schedule.nodes {
        writeln!(writer, "NODE {}", node.id)?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders a schedule as text.
pub fn schedule_to_text(schedule: &Schedule) -> String {
    schedule
        .nodes
        .iter()
        .map(|n| format!("NODE {}\n", n.id))
        .collect()
}
