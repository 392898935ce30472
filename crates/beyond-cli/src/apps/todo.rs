//! Form-based todo list.
//!
//! ```text
//! section.todoapp
//!   header.header > h1 "todos"
//!   section.main
//!     form (submit: add pending value)
//!       input#<id>.new-todo (change: store value)
//!     ul.todo-list > li > div.view > label
//! ```

use beyond::element::{self, form, input};
use beyond::{attrs, Callback, Node};

use super::{read, target_value, update, SharedModel, Todo};

pub fn render(model: &SharedModel) -> Node {
    let state = read(model);

    let on_change = {
        let model = model.clone();
        Callback::fallible(move |event| {
            target_value(event).and_then(|value| update(&model, |m| m.value = value))
        })
    };

    let on_submit = {
        let model = model.clone();
        Callback::fallible(move |_| {
            update(&model, |m| {
                let value = std::mem::take(&mut m.value);
                if value.trim().is_empty() {
                    log::debug!("ignoring empty todo");
                } else {
                    m.todos.push(Todo::new(value));
                }
            })
        })
    };

    let mut list = element::ul().attr("className", "todo-list");
    for todo in &state.todos {
        list.append(
            element::li().child(
                element::div()
                    .attr("className", "view")
                    .child(element::label().child(todo.value.as_str())),
            ),
        );
    }

    let new_todo = input(attrs! {
        "type" => "text",
        "className" => "new-todo",
        "value" => state.value.as_str(),
        "onChange" => on_change,
    });

    let main = element::section()
        .attr("className", "main")
        .child(form(attrs! { "onSubmit" => on_submit }).child(new_todo))
        .child(list);

    element::section()
        .attr("className", "todoapp")
        .child(
            element::header()
                .attr("className", "header")
                .child(element::h1().child("todos")),
        )
        .child(main)
}
