//! JSON-lines session over stdin/stdout.
//!
//! The first line written is the initial render; after that every event
//! line read from stdin gets exactly one response line. Errors are reported
//! in-band and never end the session.

use anyhow::Result;

use crate::config::Config;
use crate::session::Session;

pub fn run(config: &Config) -> Result<()> {
    let mut session = Session::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    super::write_response(&mut out, &session.start(), config.pretty)?;
    let failures = super::pump(&mut session, std::io::stdin().lock(), &mut out, config.pretty)?;

    log::info!("input closed, {failures} event(s) failed");
    Ok(())
}
