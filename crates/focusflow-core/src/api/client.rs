//! HTTP client for the posture/exercise backend.
//!
//! The backend is best-effort from the client's point of view: start/stop
//! failures are reported once and never block the local timer, and status
//! polls that fail simply leave the last data stale.

use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{ExerciseResult, SessionAck, SessionStatus};
use crate::error::ApiError;

/// Client for the session/exercise endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        // A join failure means the configured base URL is unusable.
        self.base_url
            .join(path)
            .map_err(|_| ApiError::Status {
                endpoint: "base_url",
                status: reqwest::StatusCode::BAD_REQUEST,
            })
    }

    /// `POST /session/start` -- arm the backend's detector for a new session.
    pub async fn start_session(
        &self,
        focus_seconds: u32,
        break_seconds: u32,
    ) -> Result<SessionAck, ApiError> {
        let url = self.endpoint("session/start")?;
        let resp = self
            .http
            .post(url)
            .json(&json!({
                "focus_seconds": focus_seconds,
                "break_seconds": break_seconds,
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "/session/start",
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }

    /// `POST /session/stop` -- tell the backend the focus interval is over.
    pub async fn stop_session(&self) -> Result<SessionAck, ApiError> {
        let url = self.endpoint("session/stop")?;
        let resp = self.http.post(url).json(&json!({})).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "/session/stop",
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }

    /// `GET /session/status` -- latest posture score and rep count.
    pub async fn session_status(&self) -> Result<SessionStatus, ApiError> {
        let url = self.endpoint("session/status")?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "/session/status",
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }

    /// `GET /exercise/results` -- final outcome for the completed break.
    pub async fn exercise_results(&self) -> Result<ExerciseResult, ApiError> {
        let url = self.endpoint("exercise/results")?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "/exercise/results",
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }
}
