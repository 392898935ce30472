pub mod render;
pub mod replay;
pub mod serve;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use beyond::Response;

use crate::session::Session;

/// Write one response as a single JSON line (or pretty-printed block).
///
/// A tree that cannot be encoded (non-finite numbers) is answered with an
/// error response instead.
pub fn write_response(out: &mut impl Write, response: &Response, pretty: bool) -> Result<()> {
    let encode = |response: &Response| {
        if pretty {
            serde_json::to_vec_pretty(response)
        } else {
            serde_json::to_vec(response)
        }
    };
    let bytes = match encode(response) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("response not encodable: {err}");
            encode(&Response::Error {
                message: format!("response not encodable: {err}"),
            })?
        }
    };
    out.write_all(&bytes)?;
    writeln!(out)?;
    out.flush().context("Failed to flush output")
}

/// Feed every event line of `input` through the session.
///
/// Blank lines and lines starting with `#` are skipped. A line that is not
/// UTF-8 gets an error response like any other bad event; only a failing
/// reader ends the loop. Returns how many events ended in an error response.
pub fn pump(
    session: &mut Session,
    mut input: impl BufRead,
    out: &mut impl Write,
    pretty: bool,
) -> Result<usize> {
    let mut failures = 0;
    let mut buf = Vec::new();
    for number in 1.. {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read input line {number}"))?;
        if read == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                session.handle_line(line)
            }
            Err(err) => {
                log::warn!("input line {number} is not UTF-8: {err}");
                Response::Error {
                    message: format!("input line {number} is not valid UTF-8: {err}"),
                }
            }
        };
        if matches!(response, Response::Error { .. }) {
            failures += 1;
        }
        write_response(out, &response, pretty)?;
    }
    Ok(failures)
}
