use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::traits::{ClientError, ClientResult, PortalClient};
use crate::domain::{Record, RecordRef, Workgroup};
use crate::kinds::{self, KindId};
use crate::listing::{PageResult, RequestDescriptor};
use crate::session::Session;

pub const DEFAULT_BASE_URL: &str = "https://dev-portal.safta.sa/api/v1";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const LANG_PARAM: &str = "lang";
const WORKGROUPS_PATH: &str = "workgroups/list";
const LOGIN_PATH: &str = "auth/login";
const PASSWORD_RESET_PATH: &str = "auth/password-reset/request";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub lang: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            lang: DEFAULT_LANG.to_owned(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// REST client for the portal backend. The bearer token, when given, is
/// attached to every request.
#[derive(Clone)]
pub struct HttpPortalClient {
    config: HttpConfig,
    client: Client,
}

impl HttpPortalClient {
    pub fn new(config: HttpConfig, token: Option<&str>) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|error| ClientError::Config(format!("session token is invalid: {error}")))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| {
                ClientError::Config(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.config.base_url, path)
    }

    fn lang(&self) -> [(&'static str, &str); 1] {
        [(LANG_PARAM, self.config.lang.as_str())]
    }

    async fn request_json(&self, request: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        check_status(status, &body)?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|error| {
            ClientError::Decode(format!("response was malformed JSON: {error}"))
        })
    }

    /// Exchanges credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = self
            .client
            .post(self.endpoint(LOGIN_PATH))
            .query(&self.lang())
            .json(&json!({ "email": email, "password": password }));
        let payload = self.request_json(request).await?;
        decode_login(payload)
    }

    /// Asks the backend to mail a reset link. Returns the backend's message.
    pub async fn request_password_reset(&self, email: &str) -> ClientResult<String> {
        let request = self
            .client
            .post(self.endpoint(PASSWORD_RESET_PATH))
            .query(&self.lang())
            .json(&json!({ "email": email }));
        let payload = self.request_json(request).await?;
        Ok(payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Password reset requested.")
            .to_owned())
    }
}

#[async_trait]
impl PortalClient for HttpPortalClient {
    async fn fetch_page(
        &self,
        kind: KindId,
        descriptor: &RequestDescriptor,
    ) -> ClientResult<PageResult<Record>> {
        let request = self
            .client
            .get(self.endpoint(&descriptor.path))
            .query(&descriptor.params)
            .query(&self.lang());
        tracing::debug!(?kind, request = %descriptor, "fetching page");
        let payload = self.request_json(request).await?;
        decode_page(kind, payload)
    }

    async fn list_workgroups(&self) -> ClientResult<Vec<Workgroup>> {
        let request = self
            .client
            .get(self.endpoint(WORKGROUPS_PATH))
            .query(&self.lang());
        let payload = self.request_json(request).await?;
        decode_workgroups(payload)
    }

    async fn delete_record(&self, target: &RecordRef) -> ClientResult<()> {
        let path = kinds::delete_path(target).ok_or_else(|| {
            ClientError::Config(format!("{} cannot be deleted", target.kind.label()))
        })?;
        let request = self.client.delete(self.endpoint(&path)).query(&self.lang());
        self.request_json(request).await?;
        tracing::info!(kind = ?target.kind, id = target.id, "record deleted");
        Ok(())
    }
}

fn join_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    format!("{base}/{suffix}")
}

fn transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Transport("request timed out".to_owned())
    } else {
        ClientError::Transport(error.to_string())
    }
}

fn check_status(status: StatusCode, body: &str) -> ClientResult<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized {
            message: server_message(body),
        });
    }
    if !status.is_success() {
        tracing::warn!(%status, "request failed");
        return Err(ClientError::Server {
            status: status.as_u16(),
            message: server_message(body),
        });
    }
    Ok(())
}

/// The `message` field of an error body, when there is one.
fn server_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    payload
        .get("message")
        .or_else(|| payload.get("data").and_then(|data| data.get("message")))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    current_page: u32,
    per_page: u32,
    total_count: u64,
}

fn decode_page(kind: KindId, payload: Value) -> ClientResult<PageResult<Record>> {
    let key = kinds::kind_spec(kind).collection_key;
    let data = payload
        .get("data")
        .ok_or_else(|| ClientError::Decode("response has no data".to_owned()))?;

    let rows = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::Decode(format!("response does not contain a list for '{key}'")))?
        .iter()
        .map(|raw| {
            Record::decode(kind, raw.clone())
                .map_err(|error| ClientError::Decode(format!("{key} row decode failed: {error}")))
        })
        .collect::<ClientResult<Vec<_>>>()?;

    let pagination: Pagination = data
        .get("pagination")
        .cloned()
        .ok_or_else(|| ClientError::Decode("response has no pagination".to_owned()))
        .and_then(|raw| {
            serde_json::from_value(raw)
                .map_err(|error| ClientError::Decode(format!("pagination decode failed: {error}")))
        })?;

    Ok(PageResult {
        rows,
        total_count: pagination.total_count,
        current_page: pagination.current_page,
        page_size: pagination.per_page,
    })
}

fn decode_workgroups(payload: Value) -> ClientResult<Vec<Workgroup>> {
    let data = payload.get("data").unwrap_or(&payload);
    let list = data
        .as_array()
        .or_else(|| data.get("workgroups").and_then(Value::as_array))
        .ok_or_else(|| ClientError::Decode("response does not contain workgroups".to_owned()))?;
    list.iter()
        .map(|raw| {
            serde_json::from_value(raw.clone())
                .map_err(|error| ClientError::Decode(format!("workgroup decode failed: {error}")))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    email: String,
    #[serde(default)]
    login_name: String,
    #[serde(default)]
    role_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    user: LoginUser,
    access_token: String,
}

fn decode_login(payload: Value) -> ClientResult<Session> {
    let data = payload
        .get("data")
        .cloned()
        .ok_or_else(|| ClientError::Decode("login response has no data".to_owned()))?;
    let data: LoginData = serde_json::from_value(data)
        .map_err(|error| ClientError::Decode(format!("login response decode failed: {error}")))?;
    if data.access_token.is_empty() {
        return Err(ClientError::Decode("login response has no token".to_owned()));
    }
    Ok(Session {
        token: data.access_token,
        email: data.user.email,
        login_name: data.user.login_name,
        role: data.user.role_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        assert_eq!(
            join_endpoint("https://dev-portal.safta.sa/api/v1/", "/documents"),
            "https://dev-portal.safta.sa/api/v1/documents"
        );
        assert_eq!(
            join_endpoint(DEFAULT_BASE_URL, WORKGROUPS_PATH),
            "https://dev-portal.safta.sa/api/v1/workgroups/list"
        );
    }

    #[test]
    fn decodes_link_page_with_authoritative_pagination() {
        let payload = json!({
            "message": "ok",
            "data": {
                "links": [
                    {
                        "id": 31,
                        "title": "Standards portal",
                        "link": "https://example.org",
                        "created_at": "2024-03-05T10:00:00Z",
                        "creator_name": "Huda",
                        "status": 2,
                        "public_at": null
                    }
                ],
                "pagination": { "currentPage": 3, "perPage": 10, "totalCount": 21, "totalPages": 3 }
            }
        });

        let page = decode_page(KindId::Links, payload).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total_count, 21);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.rows[0].title(), "Standards portal");
    }

    #[test]
    fn users_are_read_from_member_users_key() {
        let payload = json!({
            "data": {
                "memberUsers": [
                    { "id": 4, "first_name": "Sara", "member_name": "Acme", "email": "s@acme.sa",
                      "total_workgroups": 3, "status": 2 }
                ],
                "pagination": { "currentPage": 1, "perPage": 10, "totalCount": 1, "totalPages": 1 }
            }
        });
        let page = decode_page(KindId::Users, payload).unwrap();
        assert_eq!(page.rows[0].kind(), KindId::Users);
    }

    #[test]
    fn missing_collection_is_a_decode_error() {
        let payload = json!({ "data": { "pagination": {} } });
        assert!(matches!(
            decode_page(KindId::Members, payload),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn error_body_message_is_extracted() {
        assert_eq!(
            server_message(r#"{"message":"Document not found"}"#).as_deref(),
            Some("Document not found")
        );
        assert_eq!(
            server_message(r#"{"data":{"message":"Invalid credentials"}}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(server_message("<html>"), None);
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            check_status(StatusCode::UNAUTHORIZED, ""),
            Err(ClientError::Unauthorized { message: None })
        );
        assert_eq!(
            check_status(StatusCode::NOT_FOUND, r#"{"message":"gone"}"#),
            Err(ClientError::Server {
                status: 404,
                message: Some("gone".into())
            })
        );
        assert!(check_status(StatusCode::OK, "").is_ok());
    }

    #[test]
    fn rejected_login_keeps_backend_message() {
        let body = r#"{"message":"Invalid credentials"}"#;
        for status in [StatusCode::UNAUTHORIZED, StatusCode::UNPROCESSABLE_ENTITY] {
            let err = check_status(status, body).unwrap_err();
            assert_eq!(err.to_string(), "Invalid credentials", "for {}", status);
        }
    }

    #[test]
    fn workgroups_accept_bare_or_keyed_lists() {
        let bare = json!({ "data": [ { "id": 1, "name": "AI Ethics" } ] });
        let keyed = json!({ "data": { "workgroups": [ { "id": "2", "name": "Data" } ] } });
        assert_eq!(decode_workgroups(bare).unwrap()[0].id, "1");
        assert_eq!(decode_workgroups(keyed).unwrap()[0].name, "Data");
    }

    #[test]
    fn login_payload_becomes_session() {
        let payload = json!({
            "message": "Logged in",
            "data": {
                "user": { "id": 1, "email": "admin@safta.sa", "login_name": "Admin", "role_type": "admin" },
                "accessToken": "abc"
            }
        });
        let session = decode_login(payload).unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.display_name(), "Admin");
    }

    #[test]
    fn bearer_header_rejects_control_characters() {
        let result = HttpPortalClient::new(HttpConfig::default(), Some("bad\ntoken"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
