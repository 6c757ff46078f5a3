use thiserror::Error;

/// Errors surfaced by the remote learning service boundary.
///
/// The taxonomy mirrors how the rest of the client reacts: `Unauthorized`
/// triggers the global logout, `Conflict` can be treated as idempotent
/// success by callers that want it, everything else renders inline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("credential missing or expired")]
    Unauthorized,

    #[error("{detail}")]
    Conflict { detail: String },

    #[error("{detail}")]
    NotFound { detail: String },

    #[error("{detail}")]
    Service { status: u16, detail: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// Human-readable detail for inline error panels: the service-supplied
    /// detail when present, otherwise the error's own display, otherwise a
    /// generic default.
    #[must_use]
    pub fn detail_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Неизвестная ошибка".to_string()
        } else {
            message
        }
    }
}

/// Parse the service's JSON error payload into a human-readable detail.
///
/// The service sends either `{"detail": "..."}` or a validation list
/// `{"detail": [{"msg": "..."}, ..]}`; anything else falls back to the raw
/// body or the provided status text.
#[must_use]
pub fn detail_from_body(body: &str, status_text: &str) -> String {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);
    if let Ok(value) = parsed {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
                return detail.clone();
            }
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            Some(other) if !other.is_null() => {
                return other.to_string();
            }
            _ => {}
        }
    }
    if body.trim().is_empty() {
        status_text.to_string()
    } else {
        body.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        assert_eq!(
            detail_from_body(r#"{"detail": "Урок не найден"}"#, "404 Not Found"),
            "Урок не найден"
        );
    }

    #[test]
    fn validation_list_joins_messages() {
        let body = r#"{"detail": [{"msg": "field required"}, {"msg": "too short"}]}"#;
        assert_eq!(detail_from_body(body, "422"), "field required; too short");
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        assert_eq!(detail_from_body("", "502 Bad Gateway"), "502 Bad Gateway");
    }

    #[test]
    fn conflict_detail_is_displayed() {
        let err = ApiError::Conflict {
            detail: "word already in vocabulary".to_string(),
        };
        assert!(err.is_conflict());
        assert_eq!(err.detail_message(), "word already in vocabulary");
    }
}
