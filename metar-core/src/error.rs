use reqwest::StatusCode;
use thiserror::Error;

/// Coarse failure categories surfaced to callers of the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    NetworkError,
    DecodeError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::NetworkError => "network error",
            ErrorKind::DecodeError => "decode error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum MetarError {
    #[error("Could not build METAR request: {0}")]
    InvalidRequest(String),

    #[error("METAR request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("METAR request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse METAR JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Station entry {index} has an empty `{field}` field")]
    EmptyField { index: usize, field: &'static str },
}

impl MetarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Transport(_) | Self::Status { .. } => ErrorKind::NetworkError,
            Self::Decode(_) | Self::EmptyField { .. } => ErrorKind::DecodeError,
        }
    }

    /// Short message suitable for showing in place of a report.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidRequest => {
                "Weather request could not be built. Check the configured base URL and API key."
                    .to_string()
            }
            ErrorKind::NetworkError => match self {
                Self::Status { status, .. } => {
                    format!("API call failed (HTTP {}). Try again later.", status.as_u16())
                }
                _ => "API call failed. Check your connection and try again.".to_string(),
            },
            ErrorKind::DecodeError => {
                "API call failed: the weather provider returned unexpected data.".to_string()
            }
        }
    }
}

/// Cap response bodies quoted in error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_network_errors() {
        let err = MetarError::Status { status: StatusCode::NOT_FOUND, body: String::new() };
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(err.user_message().contains("404"));
    }

    #[test]
    fn empty_field_is_a_decode_error() {
        let err = MetarError::EmptyField { index: 2, field: "icao" };
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert!(err.to_string().contains("entry 2"));
    }

    #[test]
    fn json_errors_convert_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MetarError::from(json_err);
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }

    #[test]
    fn invalid_request_kind() {
        let err = MetarError::InvalidRequest("bad url".into());
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.kind().to_string(), "invalid request");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(150);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
