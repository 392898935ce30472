//! Demo applications.
//!
//! Both are todo lists over the same model; they differ in how the tree is
//! laid out and which events they bind.

pub mod filters;
pub mod todo;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use beyond::{BoxError, Node};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Form with a text input and a plain list
    Todo,
    /// Filter buttons, progress line and per-item "done" buttons
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Wip,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Wip => "wip",
            Status::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Wip,
    Done,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Wip, Filter::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Wip => "wip",
            Filter::Done => "done",
        }
    }

    pub fn shows(self, status: Status) -> bool {
        match self {
            Filter::All => true,
            Filter::Wip => status == Status::Wip,
            Filter::Done => status == Status::Done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub value: String,
    pub status: Status,
}

impl Todo {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: Status::Wip,
        }
    }
}

#[derive(Debug)]
pub struct Model {
    pub todos: Vec<Todo>,
    /// Pending text of the new-todo input
    pub value: String,
    pub filter: Filter,
}

impl Model {
    pub fn new(todos: impl IntoIterator<Item = String>) -> Self {
        Self {
            todos: todos.into_iter().map(Todo::new).collect(),
            value: String::new(),
            filter: Filter::All,
        }
    }
}

pub type SharedModel = Arc<Mutex<Model>>;

pub type AppRenderer = Box<dyn FnMut() -> Node + Send>;

pub fn renderer(kind: AppKind, model: SharedModel) -> AppRenderer {
    match kind {
        AppKind::Todo => Box::new(move || todo::render(&model)),
        AppKind::Filters => Box::new(move || filters::render(&model)),
    }
}

/// Read access for rendering; a poisoned model is still rendered.
fn read(model: &SharedModel) -> MutexGuard<'_, Model> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mutation from inside a callback.
fn update(model: &SharedModel, f: impl FnOnce(&mut Model)) -> Result<(), BoxError> {
    let mut guard = model.lock().map_err(|_| "application model lock poisoned")?;
    f(&mut guard);
    Ok(())
}

/// `target.value` of an input event, required by change handlers.
fn target_value(event: &beyond::Event) -> Result<String, BoxError> {
    event
        .target_value()
        .map(str::to_string)
        .ok_or_else(|| format!("event {} carries no target.value", event.key).into())
}
