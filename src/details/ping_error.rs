use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum PingError {
    Validation { message: String },
    Resolution(ResolutionError),
    Socket(io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    NonExistentDomain,
    Timeout,
    NoNameservers,
    // The name exists but has no IPv4 address.
    NoAddress,
    Other(String),
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            PingError::Validation { message } => write!(f, "{message}"),
            PingError::Resolution(e) => write!(f, "Error: {e}"),
            PingError::Socket(e) => write!(f, "Socket error: {e}"),
        }
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PingError::Validation { .. } => None,
            PingError::Resolution(e) => Some(e),
            PingError::Socket(e) => Some(e),
        }
    }
}

impl From<io::Error> for PingError {
    fn from(error: io::Error) -> PingError {
        PingError::Socket(error)
    }
}

impl From<ResolutionError> for PingError {
    fn from(error: ResolutionError) -> PingError {
        PingError::Resolution(error)
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ResolutionError::NonExistentDomain => write!(f, "Non-existent domain."),
            ResolutionError::Timeout => write!(f, "DNS resolution timed out."),
            ResolutionError::NoNameservers => write!(f, "No DNS servers available."),
            ResolutionError::NoAddress => write!(f, "No IPv4 address found."),
            ResolutionError::Other(message) => write!(f, "DNS resolution failed: {message}"),
        }
    }
}

impl Error for ResolutionError {}
