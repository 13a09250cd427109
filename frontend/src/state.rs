use shared::{Task, Truthy, UpdateTaskRequest};

/// The client's copy of the task list: the last list the server confirmed,
/// patched after each confirmed create, update or delete.
///
/// It is never the source of truth. Nothing here changes until a server
/// response arrives, and a failed request only overwrites the single error slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    /// Applies the result of fetching the whole list.
    pub fn loaded(&mut self, result: Result<Vec<Task>, String>) {
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        self.loading = false;
    }

    /// Applies the result of a create request. Returns whether it succeeded,
    /// which tells the add form whether to clear its inputs.
    ///
    /// The new task is prepended rather than re-fetched: this relies on the
    /// server listing tasks newest first.
    pub fn created(&mut self, result: Result<Task, String>) -> bool {
        match result {
            Ok(task) => {
                self.tasks.insert(0, task);
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    /// The full update body for an edit of task `id`: its current record with
    /// the edited title and description. `None` once the task is gone locally.
    pub fn update_request(
        &self,
        id: i64,
        task_title: String,
        description: String,
    ) -> Option<UpdateTaskRequest> {
        let task = self.find(id)?;
        Some(UpdateTaskRequest {
            title: Some(task_title),
            description: Some(description),
            completed: Truthy(task.completed),
        })
    }

    /// The full update body that flips completion of task `id`. A toggle for a
    /// task no longer held locally yields `None` and is dropped.
    pub fn toggle_request(&self, id: i64) -> Option<UpdateTaskRequest> {
        let task = self.find(id)?;
        Some(UpdateTaskRequest {
            title: Some(task.title.clone()),
            description: task.description.clone(),
            completed: Truthy(!task.completed),
        })
    }

    /// Applies the result of an update request for task `id`.
    pub fn updated(&mut self, id: i64, result: Result<Task, String>) -> bool {
        match result {
            Ok(updated) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *task = updated;
                }
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    /// Applies the result of a delete request for task `id`.
    pub fn deleted(&mut self, id: i64, result: Result<(), String>) {
        match result {
            Ok(()) => self.tasks.retain(|t| t.id != id),
            Err(message) => self.error = Some(message),
        }
    }

    fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
