//! One client conversation: an app, its dispatcher, and the last tree sent.
//!
//! Event keys of the form `$<event>:<n>` are placeholders for the n-th
//! binding (0-indexed, depth-first) of `<event>` in the last tree, so that
//! scripted sessions can be written before the keys exist.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use beyond::{Data, DispatchError, Dispatcher, Event, KeyAllocator, Response};

use crate::apps::{self, AppRenderer, Model};
use crate::config::Config;

pub struct Session {
    dispatcher: Dispatcher<AppRenderer>,
    last_tree: Option<Data>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let model = Arc::new(Mutex::new(Model::new(config.todos.iter().cloned())));
        let keys = KeyAllocator::new().with_attempts(config.key_attempts);
        log::info!(
            "starting {:?} app with {} todo(s), {} key attempt(s)",
            config.app,
            config.todos.len(),
            keys.attempts()
        );
        Self {
            dispatcher: Dispatcher::with_keys(apps::renderer(config.app, model), keys),
            last_tree: None,
        }
    }

    /// Initial render.
    pub fn start(&mut self) -> Response {
        let result = self.dispatcher.send();
        self.respond(result)
    }

    pub fn handle(&mut self, mut event: Event) -> Response {
        if event.key.starts_with('$') {
            match self.resolve_placeholder(&event.key) {
                Ok(key) => event.key = key,
                Err(err) => return error_response(&err),
            }
        }
        let result = self.dispatcher.recv(&event);
        self.respond(result)
    }

    /// Parse one JSON line as an `Event` and handle it.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Event>(line).context("Invalid event JSON") {
            Ok(event) => self.handle(event),
            Err(err) => error_response(&err),
        }
    }

    pub fn last_tree(&self) -> Option<&Data> {
        self.last_tree.as_ref()
    }

    fn respond(&mut self, result: Result<Data, DispatchError>) -> Response {
        match result {
            Ok(tree) => {
                self.last_tree = Some(tree.clone());
                Response::Render {
                    epoch: self.dispatcher.epoch(),
                    tree,
                }
            }
            Err(err) => {
                log::warn!("{err}");
                Response::Error {
                    message: err.to_string(),
                }
            }
        }
    }

    fn resolve_placeholder(&self, placeholder: &str) -> Result<String> {
        let tree = self
            .last_tree
            .as_ref()
            .ok_or_else(|| anyhow!("placeholder {placeholder} used before the first render"))?;
        let (event, index) = parse_placeholder(placeholder)?;
        let key = tree
            .bindings()
            .into_iter()
            .filter(|(name, _)| *name == event)
            .nth(index)
            .map(|(_, key)| key.to_string())
            .with_context(|| format!("no `{event}` binding #{index} in the current tree"))?;
        log::debug!("{placeholder} -> {key}");
        Ok(key)
    }
}

/// `$change:0` -> `("change", 0)`; a bare `$change` means index 0.
fn parse_placeholder(placeholder: &str) -> Result<(&str, usize)> {
    let body = placeholder.strip_prefix('$').unwrap_or(placeholder);
    let (event, index) = match body.split_once(':') {
        Some((event, index)) => {
            let index = index
                .parse::<usize>()
                .with_context(|| format!("bad binding index in placeholder {placeholder}"))?;
            (event, index)
        }
        None => (body, 0),
    };
    if event.is_empty() {
        bail!("placeholder {placeholder} names no event");
    }
    Ok((event, index))
}

fn error_response(err: &anyhow::Error) -> Response {
    log::warn!("{err:#}");
    Response::Error {
        message: format!("{err:#}"),
    }
}
