//! Output handling for the CLI
//!
//! - Machine output: one JSON envelope per command on stdout
//! - Interactive prompts go to the writer passed in; logs stay on stderr

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use super::errors::CliResult;

/// Write `{"status":"ok","data":...}` to `out`
pub fn write_envelope<W: Write, T: Serialize>(out: &mut W, data: &T) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_envelope(&mut lock, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_envelope_shape() {
        let mut out = Vec::new();
        write_envelope(&mut out, &vec!["brakes", "noises"]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let value: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"][1], "noises");
    }
}
