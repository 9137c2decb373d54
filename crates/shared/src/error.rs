use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Transport,
    HttpStatus,
    MalformedResponse,
    InvalidEndpoint,
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("request to chat endpoint failed: {0}")]
    Transport(String),
    #[error("chat endpoint answered with status {0}")]
    HttpStatus(u16),
    #[error("malformed chat response: {0}")]
    MalformedResponse(String),
    #[error("invalid chat endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("failed to render transcript entry: {0}")]
    Render(String),
}

impl WidgetError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WidgetError::Transport(_) => ErrorCode::Transport,
            WidgetError::HttpStatus(_) => ErrorCode::HttpStatus,
            WidgetError::MalformedResponse(_) => ErrorCode::MalformedResponse,
            WidgetError::InvalidEndpoint(_) => ErrorCode::InvalidEndpoint,
            WidgetError::Render(_) => ErrorCode::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_snake_case() {
        let code = WidgetError::MalformedResponse("no marker".into()).code();
        assert_eq!(
            serde_json::to_string(&code).expect("serialize"),
            "\"malformed_response\""
        );
    }

    #[test]
    fn status_error_mentions_status() {
        assert_eq!(
            WidgetError::HttpStatus(500).to_string(),
            "chat endpoint answered with status 500"
        );
    }
}
