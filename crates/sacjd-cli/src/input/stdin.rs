use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON loan definition. Returns None for an interactive
/// terminal or empty input so the command falls back to flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    tracing::debug!(bytes = trimmed.len(), "schedule input read from stdin");
    Ok(Some(serde_json::from_str(trimmed)?))
}
