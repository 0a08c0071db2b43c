//! Error taxonomy for backend interactions.
//!
//! Every non-2xx response is classified exactly once, in
//! [`classify_response`], into a structured [`ApiError`] kind. Downstream
//! code (notably the Cliente resolution ladder) matches on the enum variants
//! and never inspects message text itself.

use thiserror::Error;

/// Errors surfaced by the API client and the services layered on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection or transport failure - the backend is unreachable.
    #[error("could not reach the server ({0}); is the backend running?")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response with the backend's detail message (or a generic
    /// fallback embedding the status code).
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// 401 - missing, invalid or expired token. The message already tells
    /// the user to (re-)login.
    #[error("{0}")]
    Session(String),

    /// The backend reported an "already registered" conflict. Triggers the
    /// recovery lookup in the resolution ladder.
    #[error("registro duplicado: {0}")]
    Duplicate(String),

    /// A duplicate was detected but the existing record could not be
    /// retrieved by any strategy.
    #[error("{0}")]
    Recovery(String),

    /// The response body was not the JSON shape we expected.
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// True for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Classify a non-2xx response into the taxonomy.
///
/// `detail` is the parsed `detail` field of the error body, when the body had
/// one; otherwise the message falls back to a generic one embedding the
/// status code.
pub(crate) fn classify_response(status: u16, detail: Option<String>) -> ApiError {
    let detail = detail.unwrap_or_else(|| format!("no error detail provided (status {status})"));

    if status == 401 {
        return ApiError::Session(detail);
    }

    // The backend has no structured error code for conflicts; the detail
    // message is the only signal. Both the Portuguese and English spellings
    // are recognized here, and nowhere else.
    if matches!(status, 400 | 409) && is_duplicate_detail(&detail) {
        return ApiError::Duplicate(detail);
    }

    ApiError::Http { status, detail }
}

fn is_duplicate_detail(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("já cadastrado") || lower.contains("already registered")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_response(401, Some("Não autenticado".to_owned()));
        assert!(matches!(err, ApiError::Session(_)));
    }

    #[test]
    fn test_classify_duplicate_email_portuguese() {
        let err = classify_response(400, Some("Email já cadastrado.".to_owned()));
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[test]
    fn test_classify_duplicate_email_english() {
        let err = classify_response(409, Some("Email already registered".to_owned()));
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[test]
    fn test_classify_duplicate_requires_conflict_status() {
        // The same text on an unrelated status is not a conflict.
        let err = classify_response(500, Some("Email já cadastrado.".to_owned()));
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn test_classify_plain_http_error() {
        let err = classify_response(404, Some("Cliente não encontrado.".to_owned()));
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "HTTP 404: Cliente não encontrado."
        );
    }

    #[test]
    fn test_classify_missing_detail_embeds_status() {
        let err = classify_response(500, None);
        match err {
            ApiError::Http { status, detail } => {
                assert_eq!(status, 500);
                assert!(detail.contains("500"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
