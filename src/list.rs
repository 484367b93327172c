//! Parsing of UNIX style `LIST` responses.
//!
//! A listing line looks like
//!
//! ```text
//! drwxr-xr-x   1 owner    group               216132 Nov 25  2011 dir
//! ```
//!
//! and is read as: nine permission characters, two skipped columns, then the
//! link count, owner, group and size separated by spaces, a date group and
//! finally the name, which may contain spaces.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;

use columns::{Columns, DATE_COLUMN_OFFSET};
use types::{FtpError, Result};

lazy_static! {
    // This regex splits a date group into month, day and either a year or an hour and minute.
    // It accepts `Nov 25  2011` as well as `Nov  5 13:45`.
    static ref DATE_RE: Regex = Regex::new(
        r"^([A-Za-z]{3})\s+(\d{1,2})\s+(?:(\d{4})|(\d{1,2}):(\d{2}))$"
    ).unwrap();

    // Summary line `ls -l` prints ahead of the entries.
    static ref TOTAL_RE: Regex = Regex::new(r"^total\s+\d+$").unwrap();
}

const FLAGS_WIDTH: usize = 9;
const FLAGS_GAP: usize = 2;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Type of a listed object, taken from the first permission character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Link,
    /// Devices, sockets, pipes and anything else a server reports.
    Other(char),
}

impl EntryKind {
    fn from_flag(flag: char) -> EntryKind {
        match flag {
            'd' => EntryKind::Directory,
            '-' => EntryKind::File,
            'l' => EntryKind::Link,
            other => EntryKind::Other(other),
        }
    }
}

/// One remote file system object as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Base name, verbatim. May contain spaces.
    pub name: String,
    pub is_directory: bool,
    /// The first nine characters of the line.
    pub flags: String,
    /// The whole permission token, e.g. `drwxr-xr-x+`.
    pub mode: String,
    pub owner: String,
    pub group: String,
    pub size: u64,
    /// Server local time, taken as UTC. Midnight when the listing only gave a year.
    pub create_time: DateTime<Utc>,
}

impl DirectoryEntry {
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_flag(self.flags.chars().next().unwrap_or('-'))
    }

    pub fn is_symlink(&self) -> bool {
        self.kind() == EntryKind::Link
    }
}

/// Why a single listing line could not be parsed. Each variant carries the
/// offending text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// The line does not even hold the permission block and its separator.
    TooShort(String),
    /// A required column is absent.
    MissingField(&'static str),
    InvalidSize(String),
    InvalidDate(String),
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LineFault::TooShort(ref line) => write!(f, "line too short: {:?}", line),
            LineFault::MissingField(field) => write!(f, "missing {} field", field),
            LineFault::InvalidSize(ref size) => write!(f, "invalid size field: {}", size),
            LineFault::InvalidDate(ref date) => write!(f, "invalid date field: {}", date),
        }
    }
}

impl Error for LineFault {}

/// Turns raw `LIST` output into `DirectoryEntry` values.
///
/// Dates of the `Mmm dd hh:mm` form carry no year. The parser resolves them
/// against its reference instant: the reference year is used unless that
/// lands the date more than a day after the reference (or on a day the year
/// does not have), in which case the previous year is used. `ls` only drops
/// the year for recent timestamps, so the date is never in the future.
#[derive(Debug, Clone, Copy)]
pub struct ListingParser {
    reference: DateTime<Utc>,
}

impl ListingParser {
    /// A parser that resolves year-less dates against the current time.
    pub fn new() -> ListingParser {
        ListingParser::with_reference(Utc::now())
    }

    pub fn with_reference(reference: DateTime<Utc>) -> ListingParser {
        ListingParser { reference: reference }
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Parses a whole listing.
    ///
    /// Blank lines and a `total N` summary are skipped, `.` and `..` are
    /// dropped, and the remaining entries keep the server's order. The first
    /// malformed line fails the whole call: a partial listing would
    /// misrepresent the directory.
    pub fn parse_listing(&self, raw: &str) -> Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for (idx, line) in raw.split('\n').enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || TOTAL_RE.is_match(trimmed) {
                continue;
            }
            let entry = self.parse_line(trimmed)
                .map_err(|fault| FtpError::MalformedLine(idx + 1, fault))?;
            trace!("parsed listing line {}: {:?}", idx + 1, entry);
            if entry.name == "." || entry.name == ".." {
                continue;
            }
            entries.push(entry);
        }
        debug!("parsed {} listing entries", entries.len());
        Ok(entries)
    }

    /// Parses a single listing line.
    pub fn parse_line(&self, line: &str) -> ::std::result::Result<DirectoryEntry, LineFault> {
        let line = line.trim();
        let mode = line.split_whitespace().next().unwrap_or("").to_owned();

        let mut cols = Columns::new(line);
        let flags = cols.take_width(FLAGS_WIDTH)
            .ok_or_else(|| LineFault::TooShort(line.to_owned()))?;
        cols.skip(FLAGS_GAP)
            .ok_or_else(|| LineFault::TooShort(line.to_owned()))?;
        cols.trim();

        // link count
        cols.cut(' ', 0);
        let owner = cols.cut(' ', 0);
        let group = cols.cut(' ', 0);

        let size = cols.cut(' ', 0);
        if size.is_empty() {
            return Err(LineFault::MissingField("size"));
        }
        let size = size.parse::<u64>()
            .map_err(|_| LineFault::InvalidSize(size.to_owned()))?;

        let date = cols.cut(' ', DATE_COLUMN_OFFSET);
        if date.is_empty() {
            return Err(LineFault::MissingField("date"));
        }
        let create_time = self.parse_date(date)?;

        let name = cols.rest();
        if name.is_empty() {
            return Err(LineFault::MissingField("name"));
        }

        Ok(DirectoryEntry {
            name: name.to_owned(),
            is_directory: flags.starts_with('d'),
            flags: flags.to_owned(),
            mode: mode,
            owner: owner.to_owned(),
            group: group.to_owned(),
            size: size,
            create_time: create_time,
        })
    }

    fn parse_date(&self, date: &str) -> ::std::result::Result<DateTime<Utc>, LineFault> {
        let invalid = || LineFault::InvalidDate(date.to_owned());
        let caps = DATE_RE.captures(date).ok_or_else(invalid)?;

        let month = month_number(&caps[1]).ok_or_else(invalid)?;
        let day = caps[2].parse::<u32>().map_err(|_| invalid())?;

        let naive = match caps.get(3) {
            Some(year) => {
                let year = year.as_str().parse::<i32>().map_err(|_| invalid())?;
                NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            None => {
                let hour = caps[4].parse::<u32>().map_err(|_| invalid())?;
                let minute = caps[5].parse::<u32>().map_err(|_| invalid())?;
                let latest = self.reference + Duration::days(1);
                let this_year = self.reference.year();
                [this_year, this_year - 1]
                    .iter()
                    .filter_map(|&year| {
                        NaiveDate::from_ymd_opt(year, month, day)
                            .and_then(|d| d.and_hms_opt(hour, minute, 0))
                    })
                    .find(|naive| Utc.from_utc_datetime(naive) <= latest)
            }
        };

        naive.map(|naive| Utc.from_utc_datetime(&naive)).ok_or_else(invalid)
    }
}

impl Default for ListingParser {
    fn default() -> ListingParser {
        ListingParser::new()
    }
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == name).map(|idx| idx as u32 + 1)
}

/// Parses a listing with a parser referenced to the current time.
pub fn parse_listing(raw: &str) -> Result<Vec<DirectoryEntry>> {
    ListingParser::new().parse_listing(raw)
}

/// Parses one listing line with a parser referenced to the current time.
pub fn parse_line(line: &str) -> ::std::result::Result<DirectoryEntry, LineFault> {
    ListingParser::new().parse_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ListingParser {
        ListingParser::with_reference(Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap(),
        ))
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn parses_directory_line() {
        let entry = parser()
            .parse_line("drwxr-xr-x   1 owner    group               216132 Nov 25  2011 dir")
            .unwrap();
        assert_eq!(entry.flags, "drwxr-xr-");
        assert_eq!(entry.mode, "drwxr-xr-x");
        assert!(entry.is_directory);
        assert_eq!(entry.kind(), EntryKind::Directory);
        assert_eq!(entry.owner, "owner");
        assert_eq!(entry.group, "group");
        assert_eq!(entry.size, 216132);
        assert_eq!(entry.create_time, at(2011, 11, 25, 0, 0));
        assert_eq!(entry.name, "dir");
    }

    #[test]
    fn parses_file_with_spaces_in_name() {
        let entry = parser()
            .parse_line("-rw-r--r--   1 ftp      ftp             0 Jan  3  2020 annual report 2019.pdf")
            .unwrap();
        assert!(!entry.is_directory);
        assert_eq!(entry.kind(), EntryKind::File);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.name, "annual report 2019.pdf");
    }

    #[test]
    fn symlink_name_is_kept_verbatim() {
        let entry = parser()
            .parse_line("lrwxrwxrwx   1 root     root            7 Feb  1  2021 bin -> usr/bin")
            .unwrap();
        assert!(entry.is_symlink());
        assert!(!entry.is_directory);
        assert_eq!(entry.name, "bin -> usr/bin");
    }

    #[test]
    fn other_type_characters() {
        let entry = parser()
            .parse_line("crw-rw-rw-   1 root     root            0 Feb  1  2021 null")
            .unwrap();
        assert_eq!(entry.kind(), EntryKind::Other('c'));
        assert!(!entry.is_directory);
    }

    #[test]
    fn acl_marker_is_part_of_mode_only() {
        let entry = parser()
            .parse_line("drwxr-xr-x+  4 alice    staff         128 Nov 25  2011 shared")
            .unwrap();
        assert_eq!(entry.flags, "drwxr-xr-");
        assert_eq!(entry.mode, "drwxr-xr-x+");
        assert_eq!(entry.owner, "alice");
        assert_eq!(entry.name, "shared");
    }

    #[test]
    fn time_of_day_uses_reference_year() {
        let entry = parser()
            .parse_line("-rw-r--r--   1 ftp      ftp          1024 Mar  9 08:15 recent.log")
            .unwrap();
        assert_eq!(entry.create_time, at(2024, 3, 9, 8, 15));
    }

    #[test]
    fn time_of_day_in_the_future_means_last_year() {
        let entry = parser()
            .parse_line("-rw-r--r--   1 ftp      ftp          1024 Dec 24 18:00 xmas.txt")
            .unwrap();
        assert_eq!(entry.create_time, at(2023, 12, 24, 18, 0));
    }

    #[test]
    fn time_of_day_on_leap_day_falls_back_a_year_when_needed() {
        let reference = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        );
        let entry = ListingParser::with_reference(reference)
            .parse_line("-rw-r--r--   1 ftp      ftp          1 Feb 29 10:00 leap")
            .unwrap();
        assert_eq!(entry.create_time, at(2024, 2, 29, 10, 0));
    }

    #[test]
    fn month_names_ignore_case() {
        let entry = parser()
            .parse_line("-rw-r--r--   1 ftp      ftp          1 NOV 25  2011 x")
            .unwrap();
        assert_eq!(entry.create_time, at(2011, 11, 25, 0, 0));
    }

    #[test]
    fn short_line_is_rejected() {
        assert_eq!(parser().parse_line("drwx"), Err(LineFault::TooShort("drwx".to_owned())));
        assert_eq!(
            parser().parse_line("drwxr-xr-x"),
            Err(LineFault::TooShort("drwxr-xr-x".to_owned()))
        );
    }

    #[test]
    fn bad_size_is_rejected() {
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp      ftp       12k Nov 25  2011 x"),
            Err(LineFault::InvalidSize("12k".to_owned()))
        );
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp      ftp       -5 Nov 25  2011 x"),
            Err(LineFault::InvalidSize("-5".to_owned()))
        );
    }

    #[test]
    fn bad_date_is_rejected() {
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp      ftp       5 Foo 25  2011 x"),
            Err(LineFault::InvalidDate("Foo 25  2011".to_owned()))
        );
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp      ftp       5 Feb 30  2011 x"),
            Err(LineFault::InvalidDate("Feb 30  2011".to_owned()))
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp      ftp       5 Nov 25  2011"),
            Err(LineFault::MissingField("name"))
        );
    }

    #[test]
    fn missing_size_is_rejected() {
        assert_eq!(
            parser().parse_line("-rw-r--r--   1 ftp"),
            Err(LineFault::MissingField("size"))
        );
    }

    #[test]
    fn empty_listing_is_empty() {
        assert!(parser().parse_listing("").unwrap().is_empty());
        assert!(parser().parse_listing("\r\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn dot_entries_are_dropped_and_order_kept() {
        let raw = "drwxr-xr-x   2 ftp      ftp          4096 Nov 25  2011 .\n\
                   drwxr-xr-x   9 ftp      ftp          4096 Nov 25  2011 ..\n\
                   -rw-r--r--   1 ftp      ftp            10 Nov 25  2011 zeta\n\
                   drwxr-xr-x   2 ftp      ftp          4096 Nov 25  2011 alpha\n";
        let entries = parser().parse_listing(raw).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(!entries[0].is_directory);
        assert!(entries[1].is_directory);
    }

    #[test]
    fn crlf_and_total_line_are_tolerated() {
        let raw = "total 8\r\n\
                   -rw-r--r--   1 ftp      ftp            10 Nov 25  2011 a.txt\r\n\
                   -rw-r--r--   1 ftp      ftp            20 Nov 25  2011 b.txt\r\n";
        let entries = parser().parse_listing(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[1].size, 20);
    }

    #[test]
    fn one_bad_line_fails_the_listing() {
        let raw = "-rw-r--r--   1 ftp      ftp            10 Nov 25  2011 a.txt\n\
                   -rw-r--r--   1 ftp      ftp          many Nov 25  2011 b.txt\n";
        match parser().parse_listing(raw) {
            Err(FtpError::MalformedLine(2, LineFault::InvalidSize(ref size))) => assert_eq!(size, "many"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
