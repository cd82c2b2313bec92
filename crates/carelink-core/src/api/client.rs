use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::MessagingApi;
use crate::config::CoreConfig;
use crate::constants::paths;
use crate::error::ApiError;
use crate::models::{de, Message, MessageList, Profile};
use crate::session::UserType;

/// Response of `POST /forms/login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "userId", deserialize_with = "de::id")]
    pub user_id: u64,
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// JSON-over-HTTP client for the backend.
pub struct HttpApi {
    base: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.api_base())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = check_status(response).await?;
        // An empty or non-JSON success body is still a success.
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let value = self
            .post_json(paths::LOGIN, &json!({ "email": email, "password": password }))
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Turn a non-OK response into `ApiError::Server`, reading its `error` field if any.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string));
    Err(ApiError::server(status.as_u16(), message))
}

#[async_trait]
impl MessagingApi for HttpApi {
    async fn fetch_messages(&self, user_id: u64) -> Result<Vec<Message>, ApiError> {
        let list: MessageList = self.get_json(&paths::messages_for(user_id)).await?;
        debug!(user_id, count = list.messages.len(), "fetched messages");
        Ok(list.messages)
    }

    async fn send_message(
        &self,
        sender_id: u64,
        receiver_id: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            paths::MESSAGES,
            &json!({
                "sender_id": sender_id,
                "receiver_id": receiver_id,
                "body": body,
            }),
        )
        .await?;
        Ok(())
    }

    async fn mark_read(&self, user_id: u64, other_id: u64) -> Result<(), ApiError> {
        self.post_json(
            paths::MESSAGES_READ,
            &json!({ "user_id": user_id, "other_id": other_id }),
        )
        .await?;
        Ok(())
    }

    async fn fetch_profile(&self, role: UserType, id: u64) -> Result<Profile, ApiError> {
        let value: Value = self.get_json(&paths::profile(role.as_str(), id)).await?;
        Ok(Profile::from_value(&value))
    }
}
