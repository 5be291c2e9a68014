/// Types implementing TraceLine can be written to the human-readable
/// simulation trace, one line per value.
pub trait TraceLine {
    /// Renders the value as a single trace line, without a trailing newline.
    fn trace_line(&self) -> String;
}
