use crate::messages;
use std::borrow::Cow;

/// Failure of one registration step.
///
/// Every variant is terminal for the current attempt only; the session stays usable.
#[vreg_derive::vreg_error]
pub enum RegistrationError {
    /// Empty fields or a malformed plate; no network call was made.
    #[error("Invalid input{}: {message}", format_context(.context))]
    Input { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Outside the operating windows without the admin override.
    #[error("Registration closed{}: {message}", format_context(.context))]
    Policy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The plate is already registered.
    #[error("Duplicate registration{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The endpoint answered, but not with a success.
    #[error("Remote rejected{}: {message}", format_context(.context))]
    Remote { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Remote unreachable{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
    #[error("Remote response malformed{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },
    /// Wrong admin password.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Session not found{}: {message}", format_context(.context))]
    SessionNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistrationError {
    pub(crate) fn input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Input { message: message.into(), context: None }
    }

    /// Text meant for the person filling in the form.
    #[must_use]
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            Self::Input { message, .. }
            | Self::Policy { message, .. }
            | Self::Duplicate { message, .. }
            | Self::Remote { message, .. }
            | Self::Auth { message, .. }
            | Self::SessionNotFound { message, .. } => message.clone(),
            Self::Transport { .. } | Self::Decode { .. } | Self::Internal { .. } => {
                Cow::Borrowed(messages::REMOTE_FAILED)
            },
        }
    }

    /// Whether the failure came from the remote endpoint (and may succeed on retry).
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::Remote { .. } | Self::Transport { .. } | Self::Decode { .. })
    }
}

#[cfg(feature = "server")]
mod response {
    use super::RegistrationError;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    #[vreg_derive::api_model]
    /// Error body
    pub struct ErrorBody {
        /// Stable error kind, e.g. `duplicate`
        pub kind: String,
        /// User-facing message
        pub message: String,
        /// Diagnostic detail
        pub detail: String,
    }

    impl RegistrationError {
        #[must_use]
        pub const fn status(&self) -> StatusCode {
            match self {
                Self::Input { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Self::Policy { .. } => StatusCode::FORBIDDEN,
                Self::Duplicate { .. } => StatusCode::CONFLICT,
                Self::Remote { .. } | Self::Transport { .. } | Self::Decode { .. } => {
                    StatusCode::BAD_GATEWAY
                },
                Self::Auth { .. } => StatusCode::UNAUTHORIZED,
                Self::SessionNotFound { .. } => StatusCode::NOT_FOUND,
                Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for RegistrationError {
        fn into_response(self) -> Response {
            let body = ErrorBody {
                kind: self.kind().to_owned(),
                message: self.user_message().into_owned(),
                detail: self.to_string(),
            };
            (self.status(), Json(body)).into_response()
        }
    }
}

#[cfg(feature = "server")]
pub use response::ErrorBody;
