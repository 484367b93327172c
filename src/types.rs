//! Error and result types shared by the whole crate

use std::convert::From;
use std::error::Error;
use std::fmt;
use std::io;

use list::LineFault;

/// A shorthand for a Result whose error type is always an FtpError.
pub type Result<T> = ::std::result::Result<T, FtpError>;

/// `FtpError` is a library-global error type to describe the different kinds of
/// errors that might occur while navigating or listing a remote directory.
#[derive(Debug)]
pub enum FtpError {
    /// Reported by a transport that could not complete the round-trip.
    ConnectionError(io::Error),
    /// Reported by a transport that got an unusable reply from the server.
    InvalidResponse(String),
    /// A listing line, identified by its 1-based line number, did not parse.
    MalformedLine(usize, LineFault),
}

impl fmt::Display for FtpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FtpError::ConnectionError(ref ioerr) => write!(f, "FTP ConnectionError: {}", ioerr),
            FtpError::InvalidResponse(ref desc) => write!(f, "FTP InvalidResponse: {}", desc),
            FtpError::MalformedLine(line, ref fault) => {
                write!(f, "FTP MalformedLine: line {}: {}", line, fault)
            }
        }
    }
}

impl Error for FtpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            FtpError::ConnectionError(ref ioerr) => Some(ioerr),
            FtpError::MalformedLine(_, ref fault) => Some(fault),
            FtpError::InvalidResponse(_) => None,
        }
    }
}

impl From<io::Error> for FtpError {
    fn from(err: io::Error) -> FtpError {
        FtpError::ConnectionError(err)
    }
}
