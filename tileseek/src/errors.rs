use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, ReadExecutor};

/// Error kinds for TileSeek operations.
///
/// Each kind describes a category of failure so that callers can react to the
/// class of a problem without parsing messages.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A tile handle is dead or a required tile section cannot be opened.
    TileUnreadable,
    /// A tile section decoded into something this library does not understand.
    MalformedIndex,
    /// The tile store has been closed and can no longer serve requests.
    StoreClosed,
    /// The operation is not valid in the current context.
    InvalidOperation,
    /// Generic IO error.
    IOError,
    /// Internal error (usually indicates a bug).
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TileUnreadable => write!(f, "Tile unreadable"),
            ErrorKind::MalformedIndex => write!(f, "Malformed index"),
            ErrorKind::StoreClosed => write!(f, "Store closed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom TileSeek error type.
///
/// `TileSeekError` carries the error message, its [`ErrorKind`] and an
/// optional cause, enabling error chaining. A backtrace is captured at
/// construction time for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use tileseek::errors::{ErrorKind, TileSeekError, TileSeekResult};
///
/// fn open_section() -> TileSeekResult<()> {
///     Err(TileSeekError::new(
///         "text index section is missing",
///         ErrorKind::TileUnreadable,
///     ))
/// }
/// ```
#[derive(Clone)]
pub struct TileSeekError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<TileSeekError>>,
    backtrace: Atomic<Backtrace>,
}

impl TileSeekError {
    /// Creates a new `TileSeekError` with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        TileSeekError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `TileSeekError` with a cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: TileSeekError) -> Self {
        TileSeekError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&TileSeekError> {
        self.cause.as_deref()
    }
}

impl Display for TileSeekError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for TileSeekError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self
                .backtrace
                .read_with(|bt| write!(f, "{}\n{:?}", self.message, bt)),
        }
    }
}

impl Error for TileSeekError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for TileSeek operations.
///
/// `TileSeekResult<T>` is shorthand for `Result<T, TileSeekError>`. All
/// fallible TileSeek operations return this type.
pub type TileSeekResult<T> = Result<T, TileSeekError>;

impl From<std::io::Error> for TileSeekError {
    fn from(err: std::io::Error) -> Self {
        TileSeekError::new(&err.to_string(), ErrorKind::IOError)
    }
}
