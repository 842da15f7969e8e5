use thiserror::Error;

/// Errors that can occur while building, sending or interpreting a service call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CrossBorderError {
    /// The caller broke a constructor or method contract (wrong type,
    /// missing required field, empty item list).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network or HTTP-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// XML in either direction could not be parsed.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The response parsed, but the envelope/body/result path was missing.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The service answered with a SOAP fault.
    #[error("SOAP fault {code}: {message}")]
    Fault {
        /// `faultcode` text.
        code: String,
        /// `faultstring` text.
        message: String,
    },

    /// The service reported a non-zero error code in a well-formed body.
    #[error("{}", service_message(.code, .message))]
    Service {
        /// Service error code (never zero).
        code: i64,
        /// Human-readable message from the response body, if any.
        message: Option<String>,
    },

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl CrossBorderError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The service error code, when this is a service-reported error.
    pub fn service_code(&self) -> Option<i64> {
        match self {
            Self::Service { code, .. } => Some(*code),
            _ => None,
        }
    }
}

fn service_message(code: &i64, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(m) if !m.is_empty() => format!("Code {code} — {m}"),
        _ => format!("Code {code}"),
    }
}
