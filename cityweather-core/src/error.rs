use thiserror::Error;

/// Failure of a single weather query.
///
/// The `Display` text of each variant is the message shown to the user, so
/// it stays short and free of request details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Provider answered with a non-success HTTP status.
    #[error("City not found")]
    NotFound { status: u16 },

    /// No response was obtained (DNS, connect, TLS, timeout, broken body).
    #[error("{0}")]
    Transport(String),

    /// Response body did not have the expected shape.
    #[error("Unexpected response from weather service")]
    Parse { detail: String },

    /// The request task panicked or was cancelled before it resolved.
    #[error("Weather query was interrupted")]
    Interrupted,
}

impl QueryError {
    /// Build a transport error from an error and its whole `source()` chain.
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();

        while let Some(cause) = source {
            let text = cause.to_string();
            // hyper and reqwest often repeat the inner message verbatim
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }

        QueryError::Transport(message)
    }
}
