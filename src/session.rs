//! Session state and the listing round-trip.

use std::fmt;

use list::{DirectoryEntry, ListingParser};
use path::{target_url, WorkingDirectory};
use types::Result;

/// Port used when a session is not told otherwise.
pub const DEFAULT_PORT: u16 = 21;

/// User name and password handed to the transport with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything a transport needs to fetch one directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// `ftp://host:port/path` of the directory.
    pub url: String,
    pub host: String,
    pub port: u16,
    /// Remote directory to list.
    pub path: String,
    pub credentials: Option<Credentials>,
}

/// The network side of a listing: sends `LIST` for the requested directory
/// and returns the raw response text.
pub trait ListingTransport {
    fn fetch_listing(&mut self, request: &ListRequest) -> Result<String>;
}

impl<F> ListingTransport for F
where
    F: FnMut(&ListRequest) -> Result<String>,
{
    fn fetch_listing(&mut self, request: &ListRequest) -> Result<String> {
        self(request)
    }
}

/// A connection profile plus the working directory navigated so far.
///
/// ## Example
///
/// ```rust
/// use ftp_listing::{ListRequest, Session};
///
/// let mut session = Session::new("127.0.0.1");
/// session.set_credentials("anonymous", "guest");
/// session.change_dir("pub");
///
/// let mut transport = |req: &ListRequest| -> ftp_listing::Result<String> {
///     assert_eq!(req.url, "ftp://127.0.0.1:21/pub");
///     Ok("-rw-r--r--   1 ftp ftp 12 Nov 25  2011 README".to_owned())
/// };
/// let entries = session.list_directory(&mut transport).unwrap();
/// assert_eq!(entries[0].name, "README");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    server: String,
    port: u16,
    credentials: Option<Credentials>,
    cwd: WorkingDirectory,
}

impl Session {
    /// Creates a session for `server` on `DEFAULT_PORT`, positioned at `/`.
    pub fn new<S: Into<String>>(server: S) -> Session {
        Session {
            server: server.into(),
            port: DEFAULT_PORT,
            credentials: None,
            cwd: WorkingDirectory::new(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn set_server<S: Into<String>>(&mut self, server: S) {
        self.server = server.into();
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials<U: Into<String>, P: Into<String>>(&mut self, username: U, password: P) {
        self.credentials = Some(Credentials::new(username, password));
    }

    pub fn current_dir(&self) -> &str {
        self.cwd.as_str()
    }

    pub fn is_root_directory(&self) -> bool {
        self.cwd.is_root()
    }

    /// Moves the working directory and returns the new one.
    /// `..` goes up, `/...` jumps, anything else descends.
    pub fn change_dir(&mut self, input: &str) -> &str {
        self.cwd.change(input)
    }

    /// URL of the working directory, or of `relative` inside it.
    pub fn url(&self, relative: Option<&str>) -> String {
        target_url(&self.server, self.port, self.cwd.as_str(), relative)
    }

    /// Lists the working directory through `transport`.
    pub fn list_directory<T: ListingTransport>(&self, transport: &mut T) -> Result<Vec<DirectoryEntry>> {
        self.list_directory_with(transport, &ListingParser::new())
    }

    /// Lists the working directory through `transport`, parsing with `parser`.
    ///
    /// An empty response is an empty directory. Transport failures and
    /// malformed lines are returned as is.
    pub fn list_directory_with<T: ListingTransport>(
        &self,
        transport: &mut T,
        parser: &ListingParser,
    ) -> Result<Vec<DirectoryEntry>> {
        let request = ListRequest {
            url: self.url(None),
            host: self.server.clone(),
            port: self.port,
            path: self.cwd.as_str().to_owned(),
            credentials: self.credentials.clone(),
        };

        debug!("LIST {}", request.url);
        let raw = transport.fetch_listing(&request)?;
        if raw.trim().is_empty() {
            debug!("empty listing for {}", request.url);
            return Ok(Vec::new());
        }
        parser.parse_listing(&raw)
    }
}
