//! Print the initial tree and exit.

use anyhow::{bail, Result};
use beyond::Response;

use crate::config::Config;
use crate::session::Session;

pub fn run(config: &Config) -> Result<()> {
    let mut session = Session::new(config);
    let response = session.start();
    super::write_response(&mut std::io::stdout().lock(), &response, config.pretty)?;
    if let Response::Error { message } = response {
        bail!("initial render failed: {message}");
    }
    Ok(())
}
