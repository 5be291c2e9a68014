use std::io::{self, Write};

use mlfq_sim::{SimEvent, TraceLine};

/// Writes one trace line per event.
pub(crate) fn write_trace<W: Write>(
    out: &mut W,
    events: &[SimEvent],
) -> io::Result<()> {
    for event in events {
        writeln!(out, "{}", event.trace_line())?;
    }

    Ok(())
}
