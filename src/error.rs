use crate::qr::ScanError;
use std::fmt;
use std::io;

/// Every way an attendance flow can fail.
///
/// The first four variants are user errors that the presentation layer turns into dialogs. The
/// rest are infrastructure failures that abort the action that triggered them.
#[derive(Debug)]
pub enum AttendanceError {
    EmptyName,
    EmptyEmail,
    InvalidStudentId(String),
    Scan(ScanError),
    QrEncode(String),
    Database(diesel::result::Error),
    Connection(diesel::ConnectionError),
    Io(io::Error),
    Config(config::ConfigError),
}

impl AttendanceError {
    /// Returns `true` for errors caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AttendanceError::EmptyName
                | AttendanceError::EmptyEmail
                | AttendanceError::InvalidStudentId(_)
                | AttendanceError::Scan(_)
        )
    }
}

impl fmt::Display for AttendanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceError::EmptyName => write!(f, "Name cannot be empty"),
            AttendanceError::EmptyEmail => write!(f, "Email cannot be empty"),
            AttendanceError::InvalidStudentId(text) => {
                write!(f, "'{}' is not a valid student ID", text)
            }
            AttendanceError::Scan(err) => write!(f, "{}", err),
            AttendanceError::QrEncode(reason) => {
                write!(f, "Could not generate QR code: {}", reason)
            }
            AttendanceError::Database(err) => write!(f, "Database error: {}", err),
            AttendanceError::Connection(err) => write!(f, "Could not open database: {}", err),
            AttendanceError::Io(err) => write!(f, "I/O error: {}", err),
            AttendanceError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for AttendanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceError::Scan(err) => Some(err),
            AttendanceError::Database(err) => Some(err),
            AttendanceError::Connection(err) => Some(err),
            AttendanceError::Io(err) => Some(err),
            AttendanceError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScanError> for AttendanceError {
    fn from(err: ScanError) -> Self {
        AttendanceError::Scan(err)
    }
}

impl From<diesel::result::Error> for AttendanceError {
    fn from(err: diesel::result::Error) -> Self {
        AttendanceError::Database(err)
    }
}

impl From<diesel::ConnectionError> for AttendanceError {
    fn from(err: diesel::ConnectionError) -> Self {
        AttendanceError::Connection(err)
    }
}

impl From<io::Error> for AttendanceError {
    fn from(err: io::Error) -> Self {
        AttendanceError::Io(err)
    }
}

impl From<config::ConfigError> for AttendanceError {
    fn from(err: config::ConfigError) -> Self {
        AttendanceError::Config(err)
    }
}
