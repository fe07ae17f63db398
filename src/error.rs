use thiserror::Error;

/// Errors that can occur while analysing data or chart images
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Provider configuration is missing or incomplete. Raised before any request is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend answered with a non-2xx status, or the request never completed
    #[error("{}", transport_message(.status, .body))]
    Transport { status: Option<u16>, body: String },

    /// No JSON-like content could be located in the model output
    #[error("No JSON found in model response: {preview:?}")]
    Extraction { preview: String },

    /// A JSON candidate was located but could not be parsed
    #[error("Malformed JSON in model response: {source}")]
    MalformedJson {
        raw: String,
        candidate: String,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed JSON does not have the expected shape
    #[error("Unexpected response shape at `{field}`: {message}")]
    Schema { field: String, message: String },

    /// The model reported that the input cannot be analysed (e.g. not a chart)
    #[error("{reason}")]
    SemanticRejection { reason: String },

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reading an image or the settings file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading layered configuration
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

fn transport_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("Provider returned HTTP {}: {}", code, body),
        None => format!("Request to provider failed: {}", body),
    }
}

impl AnalysisError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable, machine-readable name of the error kind.
    ///
    /// Front ends use this to pick a message; `semantic_rejection` should be
    /// shown as the model's own reason rather than as a failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Configuration(_) | AnalysisError::Config(_) => "configuration",
            AnalysisError::Transport { .. } => "transport",
            AnalysisError::Extraction { .. } => "extraction",
            AnalysisError::MalformedJson { .. } => "malformed_json",
            AnalysisError::Schema { .. } => "schema",
            AnalysisError::SemanticRejection { .. } => "semantic_rejection",
            AnalysisError::InvalidInput(_) => "invalid_input",
            AnalysisError::Io(_) => "io",
        }
    }

    /// Whether a caller-level retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::Transport { .. })
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

/// Outcome classification for a custom-provider connection test
#[derive(Error, Debug)]
pub enum ConnectionTestError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 401 or 403: the API key was rejected
    #[error("Authentication failed (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    /// 404: base URL or model does not exist
    #[error("Endpoint not found: {body}")]
    EndpointNotFound { body: String },

    /// Any other non-2xx status, or a network failure
    #[error("Connection failed: {message}")]
    Connection { status: Option<u16>, message: String },
}

impl ConnectionTestError {
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ConnectionTestError::Authentication { status, body },
            404 => ConnectionTestError::EndpointNotFound { body },
            _ => ConnectionTestError::Connection {
                status: Some(status),
                message: body,
            },
        }
    }
}
