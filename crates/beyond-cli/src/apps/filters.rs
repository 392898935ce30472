//! Todo list with status filters and a progress line.

use beyond::element::{self, input};
use beyond::{attrs, BoxError, Callback, Node};

use super::{read, target_value, update, Filter, Model, SharedModel, Status, Todo};

pub fn render(model: &SharedModel) -> Node {
    let state = read(model);

    let mut root = element::div().attr("id", "root");
    root.append(element::h1().child("todos"));
    root.append(element::h2().child(progress(&state)));

    let mut filters = element::div().attr("id", "filters");
    for filter in Filter::ALL {
        filters.append(filter_button(model, state.filter, filter));
    }
    root.append(filters);

    let on_change = {
        let model = model.clone();
        Callback::fallible(move |event| {
            target_value(event).and_then(|value| update(&model, |m| m.todos.push(Todo::new(value))))
        })
    };
    root.append(input(attrs! { "type" => "text", "on_change" => on_change }));

    for (index, todo) in state.todos.iter().enumerate() {
        if state.filter.shows(todo.status) {
            root.append(item(model, index, todo));
        }
    }
    root
}

/// `"N.NN% complete!"`; an empty list is 0% complete.
fn progress(model: &Model) -> String {
    let done = model.todos.iter().filter(|t| t.status == Status::Done).count();
    let percent = if model.todos.is_empty() {
        0.0
    } else {
        done as f64 / model.todos.len() as f64 * 100.0
    };
    format!("{percent:.2}% complete!")
}

fn filter_button(model: &SharedModel, active: Filter, filter: Filter) -> Node {
    if filter == active {
        return input(attrs! { "Class" => "active", "type" => "submit", "value" => filter.as_str() });
    }
    let model = model.clone();
    let on_click = Callback::fallible(move |_| update(&model, |m| m.filter = filter));
    input(attrs! {
        "Class" => "inactive",
        "type" => "submit",
        "value" => filter.as_str(),
        "on_click" => on_click,
    })
}

fn item(model: &SharedModel, index: usize, todo: &Todo) -> Node {
    let on_done = {
        let model = model.clone();
        Callback::fallible(move |_| -> Result<(), BoxError> {
            let mut found = false;
            update(&model, |m| {
                if let Some(todo) = m.todos.get_mut(index) {
                    todo.status = Status::Done;
                    found = true;
                }
            })?;
            if found {
                Ok(())
            } else {
                Err(format!("todo #{index} no longer exists").into())
            }
        })
    };

    element::div()
        .attr("Class", format!("item {}", todo.status.as_str()))
        .child(element::span().child(todo.value.as_str()))
        .child(input(attrs! { "type" => "submit", "value" => "done", "on_click" => on_done }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beyond::{Data, Dispatcher, Element, Event};
    use std::sync::{Arc, Mutex};

    fn app(todos: &[&str]) -> (SharedModel, Dispatcher<impl FnMut() -> Node + use<>>) {
        let model = Arc::new(Mutex::new(Model::new(todos.iter().map(|t| t.to_string()))));
        let shared = model.clone();
        (model, Dispatcher::new(move || render(&shared)))
    }

    fn root(tree: &Data) -> &Element {
        tree.as_element().unwrap()
    }

    fn items(tree: &Data) -> Vec<&Element> {
        root(tree)
            .children
            .iter()
            .filter_map(Data::as_element)
            .filter(|e| e.tag == "div" && !e.attributes.contains_key("id"))
            .collect()
    }

    fn text<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
        element.attributes.get(name).and_then(|v| v.as_text())
    }

    fn button<'a>(tree: &'a Data, value: &str) -> &'a Element {
        root(tree)
            .children
            .iter()
            .filter_map(Data::as_element)
            .find(|e| text(e, "id") == Some("filters"))
            .and_then(|filters| {
                filters
                    .children
                    .iter()
                    .filter_map(Data::as_element)
                    .find(|b| text(b, "value") == Some(value))
            })
            .unwrap()
    }

    fn heading(tree: &Data) -> &beyond::Scalar {
        tree.find_tag("h2").unwrap().children[0].as_scalar().unwrap()
    }

    #[test]
    fn empty_list_is_zero_percent() {
        let (_, mut dispatcher) = app(&[]);
        let tree = dispatcher.send().unwrap();
        assert_eq!(heading(&tree).as_text(), Some("0.00% complete!"));
        assert!(items(&tree).is_empty());
    }

    #[test]
    fn active_filter_has_no_handler() {
        let (_, mut dispatcher) = app(&["Learn Rust"]);
        let tree = dispatcher.send().unwrap();

        let all = button(&tree, "all");
        assert_eq!(all.attributes["class"].as_text(), Some("active"));
        assert!(all.on.is_empty());

        let wip = button(&tree, "wip");
        assert_eq!(wip.attributes["class"].as_text(), Some("inactive"));
        assert!(wip.on.contains_key("click"));
    }

    #[test]
    fn marking_done_updates_progress_and_class() {
        let (model, mut dispatcher) = app(&["a", "b"]);
        let tree = dispatcher.send().unwrap();

        let first = items(&tree)[0];
        let done_key = first.children[1].as_element().unwrap().on["click"].clone();
        let tree = dispatcher.recv(&Event::new(done_key)).unwrap();

        assert_eq!(model.lock().unwrap().todos[0].status, Status::Done);
        assert_eq!(heading(&tree).as_text(), Some("50.00% complete!"));
        assert_eq!(items(&tree)[0].attributes["class"].as_text(), Some("item done"));
    }

    #[test]
    fn filter_hides_other_statuses() {
        let (model, mut dispatcher) = app(&["a", "b", "c"]);
        model.lock().unwrap().todos[1].status = Status::Done;
        let tree = dispatcher.send().unwrap();
        assert_eq!(items(&tree).len(), 3);

        let key = button(&tree, "done").on["click"].clone();
        let tree = dispatcher.recv(&Event::new(key)).unwrap();

        assert_eq!(model.lock().unwrap().filter, Filter::Done);
        let visible = items(&tree);
        assert_eq!(visible.len(), 1);
        let span = visible[0].children[0].as_element().unwrap();
        assert_eq!(span.children[0].as_scalar().and_then(|s| s.as_text()), Some("b"));
        assert_eq!(button(&tree, "done").attributes["class"].as_text(), Some("active"));
    }

    #[test]
    fn text_input_change_appends() {
        let (model, mut dispatcher) = app(&[]);
        let tree = dispatcher.send().unwrap();

        let (_, key) = tree
            .bindings()
            .into_iter()
            .find(|(event, _)| *event == "change")
            .unwrap();
        dispatcher
            .recv(&Event::new(key).with_target_value("Ship it"))
            .unwrap();

        assert_eq!(model.lock().unwrap().todos, vec![Todo::new("Ship it")]);
    }
}
