//! Graph API client: Send API (`POST /{version}/me/messages`) and user profile lookup.
//! Every call carries the page access token as the `access_token` query parameter.

use crate::config::MessengerConfig;
use crate::messenger::event::SendMessageRequest;
use crate::messenger::reply::ReplySender;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const PROFILE_FIELDS: &str = "first_name,last_name";

#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("graph api request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("graph api error: {0}")]
    Api(String),
    #[error("invalid graph api url: {0}")]
    InvalidUrl(String),
}

/// Display-name fields returned by the profile endpoint. Any other returned fields are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// "First Last", or whichever half is present.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Client for the Messenger Platform's Graph API.
#[derive(Clone)]
pub struct MessengerClient {
    base_url: String,
    api_version: String,
    access_token: String,
    client: reqwest::Client,
}

impl MessengerClient {
    pub fn new(config: &MessengerConfig) -> Self {
        Self {
            base_url: config.graph_api_base.trim_end_matches('/').to_string(),
            api_version: config.graph_api_version.trim_matches('/').to_string(),
            access_token: config.page_access_token.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// POST /{version}/me/messages — send a text message to a user.
    pub async fn send_text_message(
        &self,
        recipient_id: &str,
        text: &str,
    ) -> Result<(), MessengerError> {
        let url = format!("{}/{}/me/messages", self.base_url, self.api_version);
        let body = SendMessageRequest::text(recipient_id, text);
        let res = self
            .client
            .post(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MessengerError::Api(format!(
                "send message failed: {} {}",
                status, body
            )));
        }
        Ok(())
    }

    /// GET /{user_id}?fields=first_name,last_name — fetch a user's display name fields.
    pub async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, MessengerError> {
        let url = self.profile_url(user_id)?;
        let res = self
            .client
            .get(url)
            .query(&[
                ("fields", PROFILE_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MessengerError::Api(format!(
                "fetch user profile failed: {} {}",
                status, body
            )));
        }
        let profile: UserProfile = res.json().await?;
        Ok(profile)
    }
}

impl MessengerClient {
    /// `{base}/{user_id}` with the id pushed as a single percent-encoded path segment.
    fn profile_url(&self, user_id: &str) -> Result<reqwest::Url, MessengerError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| MessengerError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MessengerError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(user_id);
        Ok(url)
    }
}

#[async_trait]
impl ReplySender for MessengerClient {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), MessengerError> {
        self.send_text_message(recipient_id, text).await
    }
}
