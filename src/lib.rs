#![crate_name = "ftp_listing"]
#![crate_type = "lib"]

//! ftp_listing keeps track of an FTP session's remote working directory and
//! turns UNIX style `LIST` responses into structured entries.
//!
//! Talking to the server is left to the caller: a `ListingTransport` gets the
//! resolved request and returns the raw listing text.
//!
//! ### Usage
//!
//! ```rust
//! use ftp_listing::{ListRequest, Session};
//!
//! let mut session = Session::new("127.0.0.1");
//! session.change_dir("pub");
//! session.change_dir("..");
//! session.change_dir("incoming");
//! assert_eq!(session.current_dir(), "/incoming");
//!
//! let mut transport = |_: &ListRequest| -> ftp_listing::Result<String> {
//!     Ok("drwxr-xr-x   1 owner    group               216132 Nov 25  2011 dir\n".to_owned())
//! };
//! let entries = session.list_directory(&mut transport).unwrap();
//! assert!(entries[0].is_directory);
//! ```
//!

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
extern crate regex;
extern crate chrono;

mod columns;
pub mod list;
pub mod path;
pub mod session;
pub mod types;

pub use self::columns::{Columns, DATE_COLUMN_OFFSET};
pub use self::list::{parse_line, parse_listing, DirectoryEntry, EntryKind, LineFault, ListingParser};
pub use self::path::{resolve, target_url, WorkingDirectory};
pub use self::session::{Credentials, ListRequest, ListingTransport, Session, DEFAULT_PORT};
pub use self::types::{FtpError, Result};
