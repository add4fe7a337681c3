//! Console diagnostics shared by all stages.
//!
//! Narration goes to stdout (pipeline logs read top to bottom); warnings go
//! to stderr with a `WARN:` prefix so CI log filters can pick them out.

/// Progress narration for the run.
pub fn info(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref());
}

/// Recoverable condition worth surfacing; never aborts the run.
pub fn warn(msg: impl AsRef<str>) {
    eprintln!("WARN: {}", msg.as_ref());
}

/// Build a prefixed message for `bail!`/`anyhow!` error paths.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("ERROR: {}", msg.as_ref())
}
