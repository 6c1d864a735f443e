use crate::services::schedule_service::ScheduleError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0}")]
    Form(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Local rejections raised before any request leaves the client.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Form(_) | Error::Schedule(_)
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::Reqwest(_))
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Short text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { detail, .. } => detail.clone(),
            Error::Reqwest(err) if err.is_timeout() => "The server took too long to respond.".to_string(),
            Error::Reqwest(err) if err.is_connect() => "Could not reach the server.".to_string(),
            Error::Schedule(err) => err.to_string(),
            Error::Form(errors) => form_message(errors),
            Error::Validation(msg) | Error::NotFound(msg) | Error::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// `field: message` pairs, falling back to the validator code when a rule
/// carries no message.
fn form_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err.message.as_ref().unwrap_or(&err.code);
                format!("{}: {}", field, reason)
            })
        })
        .collect();
    if parts.is_empty() {
        return "Invalid input.".to_string();
    }
    parts.sort();
    parts.join("; ")
}
