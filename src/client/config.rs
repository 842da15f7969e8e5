use serde::{Deserialize, Serialize};

use crate::core::{CrossBorderError, DEFAULT_LANGUAGE, resolve_language};
use crate::soap::SERVICE_URI;

/// Longest merchant key the service accepts.
pub const MAX_MERCHANT_KEY_LEN: usize = 64;

/// Client construction options.
///
/// Deserializes from the same camelCase keys a JSON caller would pass:
///
/// ```
/// use crossborder::ClientConfig;
///
/// let config: ClientConfig =
///     serde_json::from_str(r#"{"merchantKey":" abc ","language":"es","stripWrapper":false}"#)
///         .unwrap();
/// assert!(!config.strip_wrapper);
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub language: Option<String>,
    pub merchant_key: String,
    pub return_raw: bool,
    pub return_soap_header: bool,
    pub strip_wrapper: bool,
    pub return_full_response: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            language: None,
            merchant_key: String::new(),
            return_raw: false,
            return_soap_header: false,
            strip_wrapper: true,
            return_full_response: false,
            endpoint: SERVICE_URI.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_key: merchant_key.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn return_raw(mut self, on: bool) -> Self {
        self.return_raw = on;
        self
    }

    pub fn return_soap_header(mut self, on: bool) -> Self {
        self.return_soap_header = on;
        self
    }

    pub fn strip_wrapper(mut self, on: bool) -> Self {
        self.strip_wrapper = on;
        self
    }

    pub fn return_full_response(mut self, on: bool) -> Self {
        self.return_full_response = on;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the language is not two characters or the
    /// merchant key is empty or longer than [`MAX_MERCHANT_KEY_LEN`].
    pub fn resolve(&self) -> Result<Settings, CrossBorderError> {
        let language = match self.language.as_deref().map(str::trim) {
            None => DEFAULT_LANGUAGE,
            Some(code) if code.chars().count() == 2 => resolve_language(code),
            Some(_) => {
                return Err(CrossBorderError::invalid(
                    "language must be a two character code",
                ));
            }
        };

        let merchant_key = self.merchant_key.trim();
        if merchant_key.is_empty() || merchant_key.chars().count() > MAX_MERCHANT_KEY_LEN {
            return Err(CrossBorderError::invalid(format!(
                "merchant key must be 1 to {MAX_MERCHANT_KEY_LEN} characters"
            )));
        }
        if self.endpoint.trim().is_empty() {
            return Err(CrossBorderError::invalid("endpoint must not be empty"));
        }

        Ok(Settings {
            language,
            merchant_key: merchant_key.to_string(),
            return_raw: self.return_raw,
            return_soap_header: self.return_soap_header,
            strip_wrapper: self.strip_wrapper,
            return_full_response: self.return_full_response,
            endpoint: self.endpoint.trim().to_string(),
            timeout_secs: self.timeout_secs,
        })
    }
}

/// Validated, immutable client settings. The only state a client holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Supported response language.
    pub language: &'static str,
    /// Trimmed partner key, 1 to 64 characters.
    pub merchant_key: String,
    /// Attach the raw response body to wrapped results.
    pub return_raw: bool,
    /// Attach the SOAP header as JSON to wrapped results.
    pub return_soap_header: bool,
    /// Return the normalized result without diagnostics.
    pub strip_wrapper: bool,
    /// Attach the transport response to wrapped results.
    pub return_full_response: bool,
    /// Service URL requests are posted to.
    pub endpoint: String,
    /// HTTP timeout in seconds, applied by `HttpTransport`.
    pub timeout_secs: u64,
}
