mod client;
mod error;
mod models;
mod resource;

pub use error::ApiError;
pub use models::{Empty, Envelope, Item, LoginData, TaskEnvelope, TaskPage, TodolistEnvelope};
pub use resource::*;

use client::Client;
use log::*;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;

/// Responsible for asynchronous interaction with the todolist API including
/// transformation of response data into explicitly-defined types.
///
/// Envelope results are returned as-is: a non-zero result code is an
/// application-level answer, not an error, and is left to the caller.
///
pub struct TodolistsApi {
    client: Client,
}

impl TodolistsApi {
    /// Returns a new instance for the given base URL and optional API key.
    ///
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        debug!("Initializing todolist API client for {}...", base_url);
        Ok(TodolistsApi {
            client: Client::new(base_url, api_key, timeout)?,
        })
    }

    /// Check whether the current session is authenticated.
    ///
    pub async fn me(&self) -> Result<Envelope<User>, ApiError> {
        debug!("Requesting session details...");
        self.client.fetch(Method::GET, "auth/me").await
    }

    /// Start a session with the given credentials.
    ///
    pub async fn login(&self, params: &LoginParams) -> Result<Envelope<LoginData>, ApiError> {
        debug!("Logging in as {}...", params.email);
        self.client.send(Method::POST, "auth/login", params).await
    }

    /// End the current session.
    ///
    pub async fn logout(&self) -> Result<Envelope<Empty>, ApiError> {
        debug!("Logging out...");
        self.client.fetch(Method::DELETE, "auth/login").await
    }

    /// Returns every todolist in server order.
    ///
    pub async fn todolists(&self) -> Result<Vec<Todolist>, ApiError> {
        debug!("Requesting todolists...");
        let todolists: Vec<Todolist> = self.client.fetch(Method::GET, "todo-lists").await?;
        debug!("Retrieved {} todolists", todolists.len());
        Ok(todolists)
    }

    pub async fn create_todolist(&self, title: &str) -> Result<TodolistEnvelope, ApiError> {
        debug!("Creating todolist '{}'...", title);
        self.client
            .send(Method::POST, "todo-lists", &json!({ "title": title }))
            .await
    }

    pub async fn update_todolist(&self, todolist_id: &str, title: &str) -> Result<Envelope<Empty>, ApiError> {
        debug!("Renaming todolist {} to '{}'...", todolist_id, title);
        self.client
            .send(
                Method::PUT,
                &format!("todo-lists/{}", todolist_id),
                &json!({ "title": title }),
            )
            .await
    }

    pub async fn delete_todolist(&self, todolist_id: &str) -> Result<Envelope<Empty>, ApiError> {
        debug!("Deleting todolist {}...", todolist_id);
        self.client
            .fetch(Method::DELETE, &format!("todo-lists/{}", todolist_id))
            .await
    }

    /// Returns the tasks of a todolist in server order.
    ///
    pub async fn tasks(&self, todolist_id: &str) -> Result<Vec<Task>, ApiError> {
        debug!("Requesting tasks for todolist {}...", todolist_id);
        let page: TaskPage = self
            .client
            .fetch(Method::GET, &format!("todo-lists/{}/tasks", todolist_id))
            .await?;
        if let Some(error) = page.error {
            warn!("Task listing for {} reported: {}", todolist_id, error);
        }
        debug!(
            "Retrieved {} of {} tasks for todolist {}",
            page.items.len(),
            page.total_count,
            todolist_id
        );
        Ok(page.items)
    }

    pub async fn create_task(&self, todolist_id: &str, title: &str) -> Result<TaskEnvelope, ApiError> {
        debug!("Creating task '{}' in todolist {}...", title, todolist_id);
        self.client
            .send(
                Method::POST,
                &format!("todo-lists/{}/tasks", todolist_id),
                &json!({ "title": title }),
            )
            .await
    }

    pub async fn update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> Result<TaskEnvelope, ApiError> {
        debug!("Updating task {} in todolist {}...", task_id, todolist_id);
        self.client
            .send(
                Method::PUT,
                &format!("todo-lists/{}/tasks/{}", todolist_id, task_id),
                model,
            )
            .await
    }

    pub async fn delete_task(&self, todolist_id: &str, task_id: &str) -> Result<Envelope<Empty>, ApiError> {
        debug!("Deleting task {} from todolist {}...", task_id, todolist_id);
        self.client
            .fetch(
                Method::DELETE,
                &format!("todo-lists/{}/tasks/{}", todolist_id, task_id),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use uuid::Uuid;

    fn api(server: &MockServer, api_key: Option<&str>) -> TodolistsApi {
        TodolistsApi::new(&server.base_url(), api_key, Duration::from_secs(5)).unwrap()
    }

    fn task_json(task: &Task) -> serde_json::Value {
        serde_json::to_value(task).unwrap()
    }

    #[tokio::test]
    async fn me_sends_api_key() -> Result<(), ApiError> {
        let key = Uuid::new_v4().to_string();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/auth/me").header("API-KEY", &key);
                then.status(200).json_body(json!({
                    "resultCode": 0,
                    "messages": [],
                    "data": { "id": 7, "email": "user@example.com", "login": "user" }
                }));
            })
            .await;

        let envelope = api(&server, Some(&key)).me().await?;
        mock.assert_async().await;
        assert!(envelope.is_success());
        assert_eq!(envelope.data.login, "user");
        Ok(())
    }

    #[tokio::test]
    async fn login_posts_credentials() -> Result<(), ApiError> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/auth/login").json_body(json!({
                    "email": "user@example.com",
                    "password": "secret",
                    "rememberMe": false
                }));
                then.status(200).json_body(json!({
                    "resultCode": 0,
                    "messages": [],
                    "data": { "userId": 7 }
                }));
            })
            .await;

        let params = LoginParams {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
            remember_me: false,
            captcha: None,
        };
        let envelope = api(&server, None).login(&params).await?;
        mock.assert_async().await;
        assert_eq!(envelope.data.user_id, Some(7));
        Ok(())
    }

    #[tokio::test]
    async fn todolists_preserve_server_order() -> Result<(), ApiError> {
        let todolists: [Todolist; 3] = Faker.fake();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/todo-lists");
                then.status(200).json_body(serde_json::to_value(&todolists).unwrap());
            })
            .await;

        let fetched = api(&server, None).todolists().await?;
        mock.assert_async().await;
        assert_eq!(fetched, todolists.to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn create_todolist_returns_item() -> Result<(), ApiError> {
        let todolist: Todolist = Faker.fake();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/todo-lists")
                    .json_body(json!({ "title": todolist.title }));
                then.status(200).json_body(json!({
                    "resultCode": 0,
                    "messages": [],
                    "data": { "item": todolist }
                }));
            })
            .await;

        let envelope = api(&server, None).create_todolist(&todolist.title).await?;
        mock.assert_async().await;
        assert_eq!(envelope.data.into_inner()?, todolist);
        Ok(())
    }

    #[tokio::test]
    async fn delete_todolist_returns_rejection_as_envelope() -> Result<(), ApiError> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/todo-lists/A");
                then.status(200).json_body(json!({
                    "resultCode": 1,
                    "messages": ["cannot delete"],
                    "data": {}
                }));
            })
            .await;

        let envelope = api(&server, None).delete_todolist("A").await?;
        mock.assert_async().await;
        assert!(!envelope.is_success());
        assert_eq!(envelope.messages[0], "cannot delete");
        Ok(())
    }

    #[tokio::test]
    async fn tasks_unwraps_items() -> Result<(), ApiError> {
        let mut tasks: [Task; 2] = Faker.fake();
        for task in tasks.iter_mut() {
            task.todolist_id = "A".to_string();
        }
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/todo-lists/A/tasks");
                then.status(200).json_body(json!({
                    "items": [task_json(&tasks[0]), task_json(&tasks[1])],
                    "totalCount": 2,
                    "error": null
                }));
            })
            .await;

        let fetched = api(&server, None).tasks("A").await?;
        mock.assert_async().await;
        assert_eq!(fetched, tasks.to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn update_task_sends_full_model() -> Result<(), ApiError> {
        let task: Task = Faker.fake();
        let model = UpdateTaskModel::from(&task);
        let server = MockServer::start_async().await;
        let path = format!("/todo-lists/{}/tasks/{}", task.todolist_id, task.id);
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path(path.as_str())
                    .json_body(serde_json::to_value(&model).unwrap());
                then.status(200).json_body(json!({
                    "resultCode": 0,
                    "messages": [],
                    "data": { "item": task_json(&task) }
                }));
            })
            .await;

        api(&server, None)
            .update_task(&task.todolist_id, &task.id, &model)
            .await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn server_error_status_is_transport_failure() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/todo-lists");
                then.status(500).body("boom");
            })
            .await;

        let error = api(&server, None).todolists().await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(error, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_deserialization_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/todo-lists");
                then.status(200).body("not json");
            })
            .await;

        let error = api(&server, None).todolists().await.unwrap_err();
        assert!(matches!(error, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_failure() {
        let api = TodolistsApi::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let error = api.todolists().await.unwrap_err();
        assert!(matches!(error, ApiError::HttpRequest(_)));
    }
}
