use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::http_client;
use crate::state::{Credential, LeagueStats, Team, TeamPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached, or the connection broke mid-response.
    Transport(String),
    /// Non-2xx answer other than an auth rejection, or an unreadable body.
    Server { status: u16, detail: String },
    /// The password was rejected at login.
    InvalidCredential,
    /// A mutation was refused for a missing or stale credential.
    Authorization,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "network error: {msg}"),
            ApiError::Server { status, detail } if detail.is_empty() => {
                write!(f, "server error (http {status})")
            }
            ApiError::Server { status, detail } => {
                write!(f, "server error (http {status}): {detail}")
            }
            ApiError::InvalidCredential => write!(f, "invalid credential"),
            ApiError::Authorization => write!(f, "not authorized"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend surface the dashboard consumes.
pub trait LeagueApi: Send + Sync {
    fn list_teams(&self) -> Result<Vec<Team>, ApiError>;
    fn get_stats(&self) -> Result<LeagueStats, ApiError>;
    fn authenticate(&self, password: &str) -> Result<Credential, ApiError>;
    fn update_team(
        &self,
        id: &str,
        patch: &TeamPatch,
        credential: &Credential,
    ) -> Result<(), ApiError>;
    fn delete_team(&self, id: &str, credential: &Credential) -> Result<(), ApiError>;
}

pub struct HttpApi {
    client: &'static Client,
    api_root: String,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl HttpApi {
    pub fn new(api_root: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_root: api_root.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_root)
    }
}

impl LeagueApi for HttpApi {
    fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let resp = send(self.client.get(self.url("/teams")))?;
        let resp = check_status(resp, None)?;
        read_json(resp)
    }

    fn get_stats(&self) -> Result<LeagueStats, ApiError> {
        let resp = send(self.client.get(self.url("/stats")))?;
        let resp = check_status(resp, None)?;
        read_json(resp)
    }

    fn authenticate(&self, password: &str) -> Result<Credential, ApiError> {
        let req = self
            .client
            .post(self.url("/admin/auth"))
            .json(&AuthRequest { password });
        let resp = send(req)?;
        let resp = check_status(resp, Some(ApiError::InvalidCredential))?;
        let body: AuthResponse = read_json(resp)?;
        Ok(Credential::new(body.token))
    }

    fn update_team(
        &self,
        id: &str,
        patch: &TeamPatch,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/admin/teams/{id}")))
            .bearer_auth(credential.token())
            .json(patch);
        let resp = send(req)?;
        check_status(resp, Some(ApiError::Authorization))?;
        Ok(())
    }

    fn delete_team(&self, id: &str, credential: &Credential) -> Result<(), ApiError> {
        let req = self
            .client
            .delete(self.url(&format!("/admin/teams/{id}")))
            .bearer_auth(credential.token());
        let resp = send(req)?;
        check_status(resp, Some(ApiError::Authorization))?;
        Ok(())
    }
}

fn send(req: RequestBuilder) -> Result<Response, ApiError> {
    req.send().map_err(|err| {
        warn!(error = %err, "request failed");
        ApiError::Transport(err.to_string())
    })
}

fn check_status(resp: Response, on_unauthorized: Option<ApiError>) -> Result<Response, ApiError> {
    let status = resp.status();
    debug!(url = %resp.url(), %status, "response");
    if status.is_success() {
        return Ok(resp);
    }
    if let Some(err) = on_unauthorized {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(err);
        }
    }
    let body = resp.text().unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        detail: error_detail(&body),
    })
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .map_err(|err| ApiError::Transport(format!("failed reading body: {err}")))?;
    serde_json::from_str(&body).map_err(|err| ApiError::Server {
        status,
        detail: format!("invalid response body: {err}"),
    })
}

/// Pulls the human-readable message out of an error body. FastAPI answers
/// `{"detail": "..."}`; anything else is passed through trimmed.
pub fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody {
            detail: Value::String(msg),
        }) => msg,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
