use std::fmt;

#[derive(Debug)]
pub enum PanelGenError {
    ConfigError(String),
    CredentialError(String),
    RequestError(String),
    ResponseError(String),
    SerializationError(String),
    TransportError(String),
    InternalError(String),
    ScriptError(String),
    PanelError {
        panel: usize,
        text: String,
        detail: String,
    },
}

impl fmt::Display for PanelGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelGenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            PanelGenError::CredentialError(msg) => write!(f, "Credential error: {}", msg),
            PanelGenError::RequestError(msg) => write!(f, "Request error: {}", msg),
            PanelGenError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            PanelGenError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            PanelGenError::TransportError(msg) => write!(f, "Transport error: {}", msg),
            PanelGenError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            PanelGenError::ScriptError(msg) => write!(f, "Script generation error: {}", msg),
            PanelGenError::PanelError {
                panel,
                text,
                detail,
            } => write!(
                f,
                "Panel {} (\"{}\") failed to render: {}",
                panel + 1,
                text,
                detail
            ),
        }
    }
}

impl std::error::Error for PanelGenError {}

pub type Result<T> = std::result::Result<T, PanelGenError>;
