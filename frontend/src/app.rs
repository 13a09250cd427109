use crate::api;
use crate::state::TaskList;
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{CreateTaskRequest, Task};
use web_sys::{console, window};

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTasks,
    TasksLoaded(Result<Vec<Task>, String>),
    SetNewTaskTitle(String),
    SetNewTaskDescription(String),
    CreateTask,
    TaskCreated(Result<Task, String>),
    ToggleTask(i64),
    EditTask(i64),
    SetEditTitle(String),
    SetEditDescription(String),
    SaveEdit(i64),
    CancelEdit,
    TaskUpdated(i64, Result<Task, String>),
    DeleteTask(i64),
    TaskDeleted(i64, Result<(), String>),
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    list: TaskList,
    new_task_title: String,
    new_task_description: String,
    submitting: bool,
    editing_task: Option<i64>,
    edit_title: String,
    edit_description: String,
}

fn report(result: &Result<impl Sized, String>) {
    if let Err(message) = result {
        console::error_1(&format!("Request failed: {}", message).into());
    }
}

fn update_cmd(id: i64, request: shared::UpdateTaskRequest) -> Cmd<Msg> {
    Cmd::new(async move {
        let result = api::update_task(id, request).await;
        report(&result);
        Msg::TaskUpdated(id, result)
    })
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTasks => {
                self.list.start_loading();
                Cmd::new(async {
                    let result = api::fetch_tasks().await;
                    report(&result);
                    Msg::TasksLoaded(result)
                })
            }
            Msg::TasksLoaded(result) => {
                self.list.loaded(result);
                Cmd::none()
            }
            Msg::SetNewTaskTitle(task_title) => {
                self.new_task_title = task_title;
                Cmd::none()
            }
            Msg::SetNewTaskDescription(description) => {
                self.new_task_description = description;
                Cmd::none()
            }
            Msg::CreateTask => {
                if self.new_task_title.trim().is_empty() || self.submitting {
                    return Cmd::none();
                }
                self.submitting = true;

                let request = CreateTaskRequest {
                    title: Some(self.new_task_title.clone()),
                    description: Some(self.new_task_description.clone()),
                };
                Cmd::new(async move {
                    let result = api::create_task(request).await;
                    report(&result);
                    Msg::TaskCreated(result)
                })
            }
            Msg::TaskCreated(result) => {
                self.submitting = false;
                // The form keeps its input when the create failed.
                if self.list.created(result) {
                    self.new_task_title.clear();
                    self.new_task_description.clear();
                }
                Cmd::none()
            }
            Msg::ToggleTask(id) => match self.list.toggle_request(id) {
                Some(request) => update_cmd(id, request),
                None => Cmd::none(),
            },
            Msg::EditTask(id) => {
                if let Some(task) = self.list.tasks().iter().find(|t| t.id == id) {
                    self.editing_task = Some(id);
                    self.edit_title = task.title.clone();
                    self.edit_description = task.description.clone().unwrap_or_default();
                }
                Cmd::none()
            }
            Msg::SetEditTitle(task_title) => {
                self.edit_title = task_title;
                Cmd::none()
            }
            Msg::SetEditDescription(description) => {
                self.edit_description = description;
                Cmd::none()
            }
            Msg::SaveEdit(id) => {
                if self.editing_task != Some(id) || self.edit_title.trim().is_empty() {
                    return Cmd::none();
                }
                match self.list.update_request(
                    id,
                    self.edit_title.clone(),
                    self.edit_description.clone(),
                ) {
                    Some(request) => update_cmd(id, request),
                    None => Cmd::none(),
                }
            }
            Msg::CancelEdit => {
                self.editing_task = None;
                Cmd::none()
            }
            Msg::TaskUpdated(id, result) => {
                // Edit mode is left only once the server confirmed the change.
                if self.list.updated(id, result) && self.editing_task == Some(id) {
                    self.editing_task = None;
                }
                Cmd::none()
            }
            Msg::DeleteTask(id) => {
                let confirmed = window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to delete this task?")
                            .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return Cmd::none();
                }
                Cmd::new(async move {
                    let result = api::delete_task(id).await;
                    report(&result);
                    Msg::TaskDeleted(id, result)
                })
            }
            Msg::TaskDeleted(id, result) => {
                self.list.deleted(id, result);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("app")],
            [
                header(
                    [class("app-header")],
                    [
                        h1([], [text("To-Do App")]),
                        p([], [text("Organize your tasks efficiently")]),
                    ],
                ),
                div(
                    [class("container")],
                    [
                        self.view_error(),
                        self.view_create_form(),
                        if self.list.is_loading() {
                            div([class("loading")], [text("Loading tasks...")])
                        } else {
                            self.view_task_list()
                        },
                    ],
                ),
            ],
        )
    }
}

impl Model {
    fn view_error(&self) -> Node<Msg> {
        match self.list.error() {
            Some(message) => div(
                [class("error")],
                [strong([], [text("Error:")]), text(&format!(" {}", message))],
            ),
            None => span([], []),
        }
    }

    fn view_create_form(&self) -> Node<Msg> {
        div(
            [class("add-task-form")],
            [
                h2([], [text("Add New Task")]),
                div(
                    [class("form-group")],
                    [
                        label([], [text("Title *")]),
                        input(
                            [
                                r#type("text"),
                                id("title"),
                                placeholder("Enter task title"),
                                value(&self.new_task_title),
                                on_input(|event| Msg::SetNewTaskTitle(event.value())),
                                disabled(self.submitting),
                            ],
                            [],
                        ),
                    ],
                ),
                div(
                    [class("form-group")],
                    [
                        label([], [text("Description")]),
                        textarea(
                            [
                                id("description"),
                                placeholder("Enter task description (optional)"),
                                value(&self.new_task_description),
                                on_input(|event| Msg::SetNewTaskDescription(event.value())),
                                disabled(self.submitting),
                            ],
                            [],
                        ),
                    ],
                ),
                button(
                    [
                        class("btn btn-primary"),
                        on_click(|_| Msg::CreateTask),
                        disabled(self.submitting),
                    ],
                    [text(if self.submitting { "Adding..." } else { "Add Task" })],
                ),
            ],
        )
    }

    fn view_task_list(&self) -> Node<Msg> {
        let tasks = self.list.tasks();
        if tasks.is_empty() {
            return div(
                [class("empty-state")],
                [p([], [text("No tasks yet. Add one above to get started!")])],
            );
        }

        div(
            [class("task-list")],
            [
                h2([], [text(&format!("Tasks ({})", tasks.len()))]),
                div(
                    [],
                    tasks
                        .iter()
                        .map(|task| self.view_task(task))
                        .collect::<Vec<_>>(),
                ),
            ],
        )
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let task_id = task.id;

        if self.editing_task == Some(task_id) {
            return div(
                [key(task_id.to_string()), class("task-item")],
                [div(
                    [class("edit-form")],
                    [
                        input(
                            [
                                r#type("text"),
                                value(&self.edit_title),
                                on_input(|event| Msg::SetEditTitle(event.value())),
                            ],
                            [],
                        ),
                        textarea(
                            [
                                value(&self.edit_description),
                                on_input(|event| Msg::SetEditDescription(event.value())),
                            ],
                            [],
                        ),
                        div(
                            [class("form-actions")],
                            [
                                button(
                                    [
                                        class("btn btn-primary"),
                                        on_click(move |_| Msg::SaveEdit(task_id)),
                                    ],
                                    [text("Save")],
                                ),
                                button(
                                    [class("btn btn-secondary"), on_click(|_| Msg::CancelEdit)],
                                    [text("Cancel")],
                                ),
                            ],
                        ),
                    ],
                )],
            );
        }

        let description = task.description.as_deref().unwrap_or_default();
        div(
            [
                key(task_id.to_string()),
                class(if task.completed {
                    "task-item completed"
                } else {
                    "task-item"
                }),
            ],
            [
                div(
                    [class("task-header")],
                    [
                        input(
                            [
                                r#type("checkbox"),
                                class("task-checkbox"),
                                checked(task.completed),
                                on_click(move |_| Msg::ToggleTask(task_id)),
                            ],
                            [],
                        ),
                        h3([class("task-title")], [text(&task.title)]),
                    ],
                ),
                if description.is_empty() {
                    span([], [])
                } else {
                    p([class("task-description")], [text(description)])
                },
                div(
                    [class("task-actions")],
                    [
                        button(
                            [class("btn btn-secondary"), on_click(move |_| Msg::EditTask(task_id))],
                            [text("Edit")],
                        ),
                        button(
                            [class("btn btn-danger"), on_click(move |_| Msg::DeleteTask(task_id))],
                            [text("Delete")],
                        ),
                    ],
                ),
            ],
        )
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
