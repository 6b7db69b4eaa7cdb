use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Record, RecordRef, Workgroup};
use crate::kinds::KindId;
use crate::listing::{FetchError, PageResult, RequestDescriptor};

/// Shown when the backend gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Transport(String),
    #[error("{}", unauthorized_text(.message))]
    Unauthorized { message: Option<String> },
    #[error("{}", server_text(.status, .message))]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("parse error: {0}")]
    Decode(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Text for the user: the backend's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            }
            | Self::Unauthorized {
                message: Some(message),
            } => message.clone(),
            Self::Server { .. } | Self::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized { .. } => FetchError::Auth(err.to_string()),
            ClientError::Transport(msg) => FetchError::Transport(msg),
            ClientError::Server { status, .. } => FetchError::Server {
                status,
                message: err.user_message(),
            },
            ClientError::Decode(_) => FetchError::Server {
                status: 200,
                message: err.user_message(),
            },
            ClientError::Config(msg) => FetchError::Validation(msg),
        }
    }
}

fn unauthorized_text(message: &Option<String>) -> String {
    message
        .clone()
        .unwrap_or_else(|| "session expired or not authorized".to_string())
}

fn server_text(status: &u16, message: &Option<String>) -> String {
    message
        .clone()
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

#[async_trait]
pub trait PortalClient: Send + Sync {
    async fn fetch_page(
        &self,
        kind: KindId,
        descriptor: &RequestDescriptor,
    ) -> ClientResult<PageResult<Record>>;

    async fn list_workgroups(&self) -> ClientResult<Vec<Workgroup>>;

    async fn delete_record(&self, target: &RecordRef) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_auth() {
        assert!(FetchError::from(ClientError::Unauthorized { message: None }).is_auth());
    }

    #[test]
    fn backend_message_is_the_display_text() {
        let rejected = ClientError::Unauthorized {
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(rejected.to_string(), "Invalid credentials");
        assert_eq!(rejected.user_message(), "Invalid credentials");

        let invalid = ClientError::Server {
            status: 422,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(invalid.to_string(), "Invalid credentials");

        let bare = ClientError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "request failed with status 502");
        assert_eq!(
            ClientError::Unauthorized { message: None }.to_string(),
            "session expired or not authorized"
        );
    }

    #[test]
    fn server_message_is_kept_verbatim() {
        let err = FetchError::from(ClientError::Server {
            status: 422,
            message: Some("Workgroup is archived".into()),
        });
        assert_eq!(
            err,
            FetchError::Server {
                status: 422,
                message: "Workgroup is archived".into()
            }
        );
    }

    #[test]
    fn server_without_message_gets_generic_text() {
        let err = FetchError::from(ClientError::Server {
            status: 500,
            message: None,
        });
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn transport_keeps_detail() {
        let err = FetchError::from(ClientError::Transport("connection refused".into()));
        assert_eq!(err, FetchError::Transport("connection refused".into()));
    }
}
