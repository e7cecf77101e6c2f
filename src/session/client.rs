//! Session API Client
//!
//! HTTP client for the drafting backend's session endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{SessionError, SessionResult};
use super::types::{
    Session, SessionField, SessionSnapshot, UpdatePayload, UpdateResponse, ViewerPage,
};

/// Operations the driver needs from the backend
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a new session (`GET /session/new`)
    async fn create_session(&self) -> SessionResult<Session>;

    /// Push an update for one session field
    async fn update(
        &self,
        session: &Session,
        field: SessionField,
        payload: UpdatePayload,
    ) -> SessionResult<UpdateResponse>;

    /// Fetch the public state of a session (`GET /json/{id}`)
    async fn snapshot(&self, session_id: &str) -> SessionResult<SessionSnapshot>;

    /// Fetch the viewer's starting state (`GET /viewer/{id}`)
    async fn viewer_page(&self, session_id: &str) -> SessionResult<ViewerPage>;

    /// Link a spectator opens to follow the session
    fn viewer_url(&self, session_id: &str) -> String;
}

/// Configuration for the HTTP session client
#[derive(Debug, Clone)]
pub struct SessionClientConfig {
    /// Base URL of the backend (e.g., "https://localhost:5000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SessionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// `reqwest`-backed implementation of [`SessionApi`]
pub struct HttpSessionClient {
    client: Client,
    base_url: String,
}

impl HttpSessionClient {
    /// Create a new client with the given configuration
    pub fn new(config: SessionClientConfig) -> SessionResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Read a JSON body, turning non-2xx statuses into [`SessionError::Api`]
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> SessionResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let bytes = response.bytes().await.map_err(SessionError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| SessionError::Decode(e.to_string()))
    }
}

/// Build the update body: `{session_id, auth_token, <field>: payload}`
pub(crate) fn update_body(session: &Session, field: SessionField, payload: &UpdatePayload) -> Value {
    let mut body = Map::new();
    body.insert("session_id".to_string(), Value::from(session.session_id.clone()));
    body.insert("auth_token".to_string(), Value::from(session.auth_token.clone()));

    let data = match payload {
        UpdatePayload::List(items) => Value::from(items.clone()),
        UpdatePayload::Single(item) => Value::from(item.clone()),
    };
    body.insert(field.as_str().to_string(), data);

    Value::Object(body)
}

#[async_trait]
impl SessionApi for HttpSessionClient {
    async fn create_session(&self) -> SessionResult<Session> {
        let url = self.endpoint(&["session", "new"]);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SessionError::from_transport)?;

        let session: Session = Self::read_json(response).await?;
        tracing::debug!(session_id = %session.session_id, "Session created");
        Ok(session)
    }

    async fn update(
        &self,
        session: &Session,
        field: SessionField,
        payload: UpdatePayload,
    ) -> SessionResult<UpdateResponse> {
        let url = self.endpoint(&["session", "update", field.as_str(), &session.session_id]);
        let body = update_body(session, field, &payload);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(SessionError::from_transport)?;

        let result: UpdateResponse = Self::read_json(response).await?;
        tracing::debug!(
            field = %field,
            success = result.success,
            error = result.error,
            "Update acknowledged"
        );
        Ok(result)
    }

    async fn snapshot(&self, session_id: &str) -> SessionResult<SessionSnapshot> {
        let url = self.endpoint(&["json", session_id]);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SessionError::from_transport)?;

        Self::read_json(response).await
    }

    async fn viewer_page(&self, session_id: &str) -> SessionResult<ViewerPage> {
        let url = self.viewer_url(session_id);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(SessionError::from_transport)?;

        Self::read_json(response).await
    }

    fn viewer_url(&self, session_id: &str) -> String {
        self.endpoint(&["viewer", session_id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpSessionClient {
        HttpSessionClient::new(SessionClientConfig {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SessionClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = client("https://draft.example.com/");
        assert_eq!(client.base_url(), "https://draft.example.com");
    }

    #[test]
    fn test_viewer_url() {
        let client = client("https://draft.example.com:8443");
        assert_eq!(
            client.viewer_url("0f3a"),
            "https://draft.example.com:8443/viewer/0f3a"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("http://localhost:5000");
        assert_eq!(
            client.endpoint(&["session", "update", "hero", "a b/c"]),
            "http://localhost:5000/session/update/hero/a%20b%2Fc"
        );
    }

    #[test]
    fn test_update_body_shape() {
        let session = Session {
            session_id: "sid".to_string(),
            auth_token: "tok".to_string(),
        };

        let body = update_body(
            &session,
            SessionField::Cards,
            &UpdatePayload::List(vec!["A".into(), "B".into(), "C".into()]),
        );
        assert_eq!(
            body,
            serde_json::json!({
                "session_id": "sid",
                "auth_token": "tok",
                "cards": ["A", "B", "C"]
            })
        );

        let body = update_body(
            &session,
            SessionField::Hero,
            &UpdatePayload::Single("mage".into()),
        );
        assert_eq!(body["hero"], "mage");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = client("http://127.0.0.1:1");
        let result = client.create_session().await;
        assert!(matches!(
            result,
            Err(SessionError::Unavailable) | Err(SessionError::Request(_))
        ));
    }
}
