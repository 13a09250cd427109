use shared::ErrorResponse;

pub const API_URL: &str = "/api";

/// Text shown to the user for a failed request: the service's own `error`
/// message when the body carries one, otherwise `fallback`.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.error)
        .unwrap_or_else(|_| fallback.to_string())
}

#[cfg(target_arch = "wasm32")]
pub use fetch::{create_task, delete_task, fetch_tasks, update_task};

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::{error_message, API_URL};
    use shared::{CreateTaskRequest, Task, UpdateTaskRequest};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    /// Sends one request and returns the response body text, or the
    /// user-facing error for any transport failure or non-2xx status.
    async fn send(
        method: &str,
        url: &str,
        body: Option<String>,
        fallback: &str,
    ) -> Result<String, String> {
        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = &body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let request =
            Request::new_with_str_and_init(url, &opts).map_err(|_| fallback.to_string())?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|_| fallback.to_string())?;
        }

        let window = web_sys::window().ok_or_else(|| fallback.to_string())?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| fallback.to_string())?
            .into();

        let text_promise = response.text().map_err(|_| fallback.to_string())?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|_| fallback.to_string())?
            .as_string()
            .unwrap_or_default();

        if response.ok() {
            Ok(text)
        } else {
            Err(error_message(&text, fallback))
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse JSON: {}", e))
    }

    pub async fn fetch_tasks() -> Result<Vec<Task>, String> {
        let url = format!("{}/tasks", API_URL);
        let text = send("GET", &url, None, "Failed to fetch tasks").await?;
        parse(&text)
    }

    pub async fn create_task(request: CreateTaskRequest) -> Result<Task, String> {
        let body = serde_json::to_string(&request).map_err(|_| "Failed to add task")?;
        let url = format!("{}/tasks", API_URL);
        let text = send("POST", &url, Some(body), "Failed to add task").await?;
        parse(&text)
    }

    pub async fn update_task(id: i64, request: UpdateTaskRequest) -> Result<Task, String> {
        let body = serde_json::to_string(&request).map_err(|_| "Failed to update task")?;
        let url = format!("{}/tasks/{}", API_URL, id);
        let text = send("PUT", &url, Some(body), "Failed to update task").await?;
        parse(&text)
    }

    pub async fn delete_task(id: i64) -> Result<(), String> {
        let url = format!("{}/tasks/{}", API_URL, id);
        send("DELETE", &url, None, "Failed to delete task").await?;
        Ok(())
    }
}
