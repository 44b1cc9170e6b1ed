use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Coarse classification of remote failures, used to pick how they surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("link service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    AliasConflict(String),
    #[error("{0}")]
    InvalidUrl(String),
    #[error("{0}")]
    NotFound(String),
    #[error("link service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("unexpected response from link service: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) | Self::Decode(_) => ErrorKind::Network,
            Self::AliasConflict(_) | Self::InvalidUrl(_) | Self::Rejected { .. } => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(ServiceError::Unavailable("down".into()).kind(), ErrorKind::Network);
        assert_eq!(ServiceError::AliasConflict("taken".into()).kind(), ErrorKind::Validation);
        assert_eq!(ServiceError::InvalidUrl("bad".into()).kind(), ErrorKind::Validation);
        assert_eq!(ServiceError::NotFound("abc".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn validation_errors_display_server_detail_verbatim() {
        let err = ServiceError::AliasConflict("Short code already in use".into());
        assert_eq!(err.to_string(), "Short code already in use");
        let err = ServiceError::NotFound("Short code not found".into());
        assert_eq!(err.to_string(), "Short code not found");
    }
}
