use serde::Deserialize;

/// Errors returned by [`crate::ApiClient`].
///
/// The `Display` text is what a front end shows to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never got an answer (network, DNS, TLS, decoding).
    #[error("Erreur réseau: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The operation needs a signed-in session.
    #[error("Vous devez être connecté")]
    NotAuthenticated,

    /// The configured API URL cannot carry a path.
    #[error("URL de l'API invalide: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            ClientError::NotAuthenticated | ClientError::InvalidUrl(_) => None,
        }
    }

    /// The session is no longer accepted by the service.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Error body rendered by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    /// Message to surface from a failed response `body`.
    pub(crate) fn message_from(body: &str, status: u16) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Erreur {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_message_then_error() {
        let body = r#"{"error":"e","message":"Capacité maximale atteinte","code":"VALIDATION_ERROR","status":400}"#;
        assert_eq!(ErrorBody::message_from(body, 400), "Capacité maximale atteinte");
        assert_eq!(ErrorBody::message_from(r#"{"error":"Interdit"}"#, 403), "Interdit");
    }

    #[test]
    fn test_message_falls_back_to_status() {
        assert_eq!(ErrorBody::message_from("<html>Bad Gateway</html>", 502), "Erreur 502");
        assert_eq!(ErrorBody::message_from(r#"{"message":"  "}"#, 500), "Erreur 500");
    }

    #[test]
    fn test_api_error_display_is_the_message() {
        let err = ClientError::Api {
            status: 409,
            message: "Créneau déjà réservé".into(),
        };
        assert_eq!(err.to_string(), "Créneau déjà réservé");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_unauthorized());
    }
}
