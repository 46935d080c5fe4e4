use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tasker_core::category::{Category, NewCategory, TaskCategory, TaskCategoryLink};
use tasker_core::task::{Task, TaskId, TaskPayload};
use tasker_core::user::{ProfileUpdate, User, UserDraft, UserId};
use tracing::{debug, warn};

use crate::{ServiceError, TaskerApi};

/// Async HTTP client implementation of TaskerApi.
/// Connects to the task backend's REST API.
pub struct HttpService {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            token: None,
        }
    }

    pub fn with_token(base_url: &str, token: String) -> Self {
        let mut svc = Self::new(base_url);
        svc.token = Some(token);
        svc
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let request = self
            .with_auth(builder)
            .build()
            .map_err(|e| ServiceError::Internal(format!("build request: {e}")))?;
        debug!(method = %request.method(), url = %request.url(), "request");
        self.client
            .execute(request)
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        handle_response(resp).await
    }

    /// GET that treats 204 No Content as an absent value.
    async fn get_optional_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ServiceError> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        handle_response(resp).await.map(Some)
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let resp = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        handle_response(resp).await
    }

    async fn put_json<B: serde::Serialize + ?Sized, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let resp = self
            .send(self.client.put(self.url(path)).json(body))
            .await?;
        handle_response(resp).await
    }

    /// Send a request whose success response carries no body worth reading.
    async fn expect_success(&self, builder: RequestBuilder) -> Result<(), ServiceError> {
        let resp = self.send(builder).await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }

    async fn delete_req(&self, path: &str) -> Result<(), ServiceError> {
        self.expect_success(self.client.delete(self.url(path))).await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error(resp: Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

async fn parse_error_with_status(status: StatusCode, resp: Response) -> ServiceError {
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let msg = error_message(&body);
    warn!(%status, %url, error = %msg, "request failed");

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(msg),
        StatusCode::CONFLICT => ServiceError::Conflict(msg),
        _ if msg.is_empty() => ServiceError::Internal(status.to_string()),
        _ => ServiceError::Internal(msg),
    }
}

/// Error text from a JSON `error`/`message` field, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["error"]
                .as_str()
                .or_else(|| v["message"].as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TaskerApi for HttpService {
    async fn logout(&self) -> Result<(), ServiceError> {
        self.expect_success(self.client.post(self.url("/api/auth/logout")))
            .await
    }

    async fn is_admin(&self) -> Result<bool, ServiceError> {
        self.get_json("/api/auth/isAdmin").await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_json("/api/tasks/getAll").await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.get_json(&format!("/api/tasks/{id}")).await
    }

    async fn create_task(&self, input: &TaskPayload) -> Result<Task, ServiceError> {
        self.post_json("/api/tasks/create", input).await
    }

    async fn update_task(&self, id: TaskId, input: &TaskPayload) -> Result<Task, ServiceError> {
        self.put_json(&format!("/api/tasks/{id}"), input).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/tasks/{id}")).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.get_json("/api/categories/getAll").await
    }

    async fn create_category(&self, name: &str) -> Result<Category, ServiceError> {
        let body = NewCategory {
            name: name.to_string(),
        };
        self.post_json("/api/categories/create", &body).await
    }

    async fn list_task_categories(&self) -> Result<Vec<TaskCategory>, ServiceError> {
        self.get_json("/api/taskcategories/").await
    }

    async fn link_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError> {
        self.expect_success(
            self.client
                .post(self.url("/api/taskcategories/create"))
                .json(link),
        )
        .await
    }

    async fn relink_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError> {
        self.expect_success(
            self.client
                .put(self.url("/api/taskcategories/update"))
                .json(link),
        )
        .await
    }

    async fn category_of_task(&self, task_id: TaskId) -> Result<Option<Category>, ServiceError> {
        self.get_optional_json(&format!("/api/taskcategories/{task_id}"))
            .await
    }

    async fn unlink_category(&self, task_id: TaskId) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/taskcategories/{task_id}"))
            .await
    }

    async fn get_profile(&self) -> Result<User, ServiceError> {
        self.get_json("/api/users/info").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ServiceError> {
        self.put_json("/api/users/update/info", update).await
    }

    async fn change_password(&self, current: &str, new: &str) -> Result<(), ServiceError> {
        self.expect_success(
            self.client
                .put(self.url("/api/users/update/password"))
                .query(&[("currentPassword", current), ("newPassword", new)]),
        )
        .await
    }

    async fn admin_list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.get_json("/api/admin/users").await
    }

    async fn admin_create_user(&self, draft: &UserDraft) -> Result<User, ServiceError> {
        self.post_json("/api/admin/users/create", draft).await
    }

    async fn admin_update_user(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<User, ServiceError> {
        self.put_json(&format!("/api/admin/users/{id}"), draft)
            .await
    }

    async fn admin_delete_user(&self, id: UserId) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/admin/users/{id}")).await
    }

    async fn admin_list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_json("/api/admin/tasks").await
    }
}
