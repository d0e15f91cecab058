//! reqwest-backed client for the auth admin API
//!
//! Owns transport details only: URL building, auth headers, the per-request
//! deadline, status checks and JSON decoding. Every failure is mapped to a
//! [`CallError`] for the call that produced it.
//!
//! TLS certificates are always verified; a verification failure surfaces as
//! [`CallError::Transport`].

use anyhow::{Context, Result};
use redact::Secret;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::auth_admin::{AuthAdmin, BulkResetResponse, CallError, ListedUser, User};
use crate::utils::constants::{
    ADMIN_TOKEN_HEADER, ADMIN_USERS_PATH, API_KEY_HEADER, FUNCTIONS_PATH,
};

/// Connection settings for the auth admin API
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Project base URL, e.g. `https://<project>.supabase.co`
    pub base_url: Url,
    /// Bearer credential, also sent as `apikey`
    pub service_key: Secret<String>,
    /// Secondary credential required by the bulk reset function
    pub admin_token: Option<Secret<String>>,
    /// Name of the bulk reset remote function
    pub bulk_function: String,
    /// Deadline for each request
    pub timeout: Duration,
}

impl ApiSettings {
    /// Whether credentials would travel over plain http
    pub fn is_insecure(&self) -> bool {
        self.base_url.scheme() == "http"
    }
}

/// Auth admin client performing one HTTP request per operation
pub struct HttpAuthAdmin {
    client: Client,
    base_url: Url,
    service_key: Secret<String>,
    admin_token: Option<Secret<String>>,
    bulk_function: String,
    timeout: Duration,
}

impl HttpAuthAdmin {
    /// Build a client with the configured per-request deadline
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("authreset/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(settings.base_url),
            service_key: settings.service_key,
            admin_token: settings.admin_token,
            bulk_function: settings.bulk_function,
            timeout: settings.timeout,
        })
    }

    /// URL of the bulk reset function
    fn bulk_reset_url(&self) -> Result<Url, CallError> {
        let mut url = self.endpoint(FUNCTIONS_PATH)?;
        push_segment(&mut url, &self.bulk_function)?;
        Ok(url)
    }

    fn users_url(&self) -> Result<Url, CallError> {
        self.endpoint(ADMIN_USERS_PATH)
    }

    /// URL of a single user; the id is percent-encoded as one path segment
    fn user_url(&self, user_id: &str) -> Result<Url, CallError> {
        let mut url = self.users_url()?;
        push_segment(&mut url, user_id)?;
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, CallError> {
        self.base_url
            .join(path)
            .map_err(|e| CallError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Request carrying the bearer credential
    fn authorized(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        self.client
            .request(method, url)
            .bearer_auth(key)
            .header(API_KEY_HEADER, key.as_str())
            .header(ACCEPT, "application/json")
    }

    /// Send a request and read the whole body, requiring HTTP 200
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, CallError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status != StatusCode::OK {
            return Err(CallError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    fn map_transport_error(&self, error: reqwest::Error) -> CallError {
        if error.is_timeout() {
            CallError::Timeout(self.timeout)
        } else {
            // `{:#}` prints the whole cause chain (connect error, TLS, ...)
            CallError::Transport(format!("{:#}", anyhow::Error::from(error)))
        }
    }
}

impl AuthAdmin for HttpAuthAdmin {
    async fn bulk_reset(&self) -> Result<BulkResetResponse, CallError> {
        let url = self.bulk_reset_url()?;
        debug!("POST {}", url);

        let mut request = self
            .authorized(Method::POST, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.admin_token {
            request = request.header(ADMIN_TOKEN_HEADER, token.expose_secret().as_str());
        }

        let body = self.send(request).await?;
        let value = serde_json::from_slice(&body).map_err(|e| decode_error(e, &body))?;
        Ok(BulkResetResponse::from_body(value))
    }

    async fn list_users(&self) -> Result<Vec<ListedUser>, CallError> {
        let url = self.users_url()?;
        debug!("GET {}", url);

        let body = self.send(self.authorized(Method::GET, url)).await?;
        parse_user_list(&body)
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), CallError> {
        let url = self.user_url(user_id)?;
        debug!("PUT {}", url);

        self.send(
            self.authorized(Method::PUT, url)
                .json(&json!({ "password": password })),
        )
        .await?;
        Ok(())
    }
}

/// The list endpoint returns either a bare array or `{"users": [...], ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum UserListBody {
    Bare(Vec<Value>),
    Wrapped { users: Vec<Value> },
}

/// Decode the list-users body into user records
///
/// Only the envelope must be valid. Each record is checked on its own, so a
/// record without a string id becomes [`ListedUser::Malformed`] instead of
/// failing the whole list.
pub fn parse_user_list(body: &[u8]) -> Result<Vec<ListedUser>, CallError> {
    let parsed: UserListBody = serde_json::from_slice(body).map_err(|e| decode_error(e, body))?;
    let records = match parsed {
        UserListBody::Bare(records) => records,
        UserListBody::Wrapped { users } => users,
    };
    Ok(records.into_iter().map(listed_user).collect())
}

fn listed_user(record: Value) -> ListedUser {
    let email = record
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string);

    match record.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => ListedUser::Valid(User {
            id: id.to_string(),
            email,
        }),
        Some(_) => ListedUser::Malformed {
            email,
            reason: "empty user id".to_string(),
            record: record.to_string(),
        },
        None => ListedUser::Malformed {
            email,
            reason: "missing or non-string user id".to_string(),
            record: record.to_string(),
        },
    }
}

fn decode_error(error: serde_json::Error, body: &[u8]) -> CallError {
    CallError::Decode {
        reason: error.to_string(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn push_segment(url: &mut Url, segment: &str) -> Result<(), CallError> {
    let display = url.to_string();
    url.path_segments_mut()
        .map_err(|_| CallError::InvalidUrl(format!("{} cannot be a base URL", display)))?
        .pop_if_empty()
        .push(segment);
    Ok(())
}
