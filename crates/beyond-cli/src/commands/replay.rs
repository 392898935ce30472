//! Replay a recorded event script.
//!
//! Same line protocol as `serve`, read from a file. Exits non-zero when any
//! event ended in an error response.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::Config;
use crate::session::Session;

pub fn run(config: &Config, file: &Path) -> Result<()> {
    let input = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let mut session = Session::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    super::write_response(&mut out, &session.start(), config.pretty)?;
    let failures = super::pump(&mut session, BufReader::new(input), &mut out, config.pretty)?;

    if failures > 0 {
        bail!("{failures} event(s) in {} failed", file.display());
    }
    let bindings = session.last_tree().map_or(0, |tree| tree.bindings().len());
    log::info!("replayed {} cleanly, final tree has {bindings} binding(s)", file.display());
    Ok(())
}
