use std::fmt;

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ConsoleError`] as the error.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Top-level error type for console request processing.
///
/// Every dispatch branch returns this type. The variant decides how the
/// caller should map the failure onto an HTTP status (see
/// [`ConsoleError::status_code`]).
#[derive(Debug)]
pub enum ConsoleError {
    /// User-supplied literal text could not be evaluated.
    Parse(ParseError),

    /// A request precondition was not met.
    Precondition(String),

    /// The database-level `op` has no handler.
    OpNotDefined(String),

    /// Database client errors that did not come from the driver itself.
    Client(ClientError),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// Configuration errors.
    Config(ConfigError),
}

/// Errors raised while evaluating user-supplied literal text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Lexical or grammatical error in the literal.
    SyntaxError(String),

    /// Unexpected token while parsing.
    UnexpectedToken { expected: String, found: String },

    /// Syntactically valid but not an allowed literal (e.g. unknown constructor).
    InvalidLiteral(String),

    /// The `byid` parameter is not a decodable identifier.
    InvalidIdentifier(String),

    /// A sort direction token could not be coerced.
    InvalidSortDirection { field: String, value: String },

    /// Update operator text was rejected; the message is prefixed for display.
    UpdateConditions(Box<ParseError>),
}

/// Errors raised by the database client boundary.
#[derive(Debug)]
pub enum ClientError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// An operation exceeded the configured per-operation timeout.
    Timeout { operation: String, timeout_ms: u64 },

    /// Server replied with something the console cannot interpret.
    UnexpectedReply(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

impl ConsoleError {
    /// HTTP-equivalent status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ConsoleError::Parse(_) | ConsoleError::Precondition(_) => 400,
            ConsoleError::OpNotDefined(_) => 404,
            ConsoleError::Client(ClientError::Timeout { .. }) => 504,
            ConsoleError::Client(_) => 502,
            _ => 500,
        }
    }

    /// True when the user can fix the request text and retry.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ConsoleError::Parse(_) | ConsoleError::Precondition(_))
    }

    /// Generic error object handed to the rendering collaborator.
    ///
    /// Driver errors also carry their code and code name under `details`.
    pub fn to_payload(&self) -> serde_json::Value {
        match self {
            ConsoleError::MongoDb(e) => {
                let info = crate::error::mongo::extract_error_info(e);
                let message = info.message.clone().unwrap_or_else(|| e.to_string());
                serde_json::json!({ "error": message, "details": info })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Parse(e) => write!(f, "{e}"),
            ConsoleError::Precondition(msg) => write!(f, "{msg}"),
            ConsoleError::OpNotDefined(op) => write!(f, "op {op} not defined"),
            ConsoleError::Client(e) => write!(f, "{e}"),
            ConsoleError::MongoDb(e) => format_mongodb_error(f, e),
            ConsoleError::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::SyntaxError(msg) => write!(f, "Syntax error: {msg}"),
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Expected {expected}, found {found}")
            }
            ParseError::InvalidLiteral(msg) => write!(f, "Invalid literal: {msg}"),
            ParseError::InvalidIdentifier(id) => write!(f, "Invalid identifier: {id}"),
            ParseError::InvalidSortDirection { field, value } => {
                write!(f, "Invalid sort direction '{value}' for field '{field}'")
            }
            ParseError::UpdateConditions(inner) => {
                write!(f, "Update conditions error: {inner}")
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ClientError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ClientError::Timeout {
                operation,
                timeout_ms,
            } => write!(f, "Operation '{operation}' timed out after {timeout_ms}ms"),
            ClientError::UnexpectedReply(msg) => write!(f, "Unexpected server reply: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Parse(e) => Some(e),
            ConsoleError::Client(e) => Some(e),
            ConsoleError::MongoDb(e) => Some(e),
            ConsoleError::Config(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ParseError {}
impl std::error::Error for ClientError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ConsoleError ========================= */

impl From<mongodb::error::Error> for ConsoleError {
    fn from(err: mongodb::error::Error) -> Self {
        ConsoleError::MongoDb(err)
    }
}

impl From<ParseError> for ConsoleError {
    fn from(err: ParseError) -> Self {
        ConsoleError::Parse(err)
    }
}

impl From<ClientError> for ConsoleError {
    fn from(err: ClientError) -> Self {
        ConsoleError::Client(err)
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(err: ConfigError) -> Self {
        ConsoleError::Config(err)
    }
}
