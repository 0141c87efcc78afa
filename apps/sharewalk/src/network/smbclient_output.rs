//! Parser for `smbclient`'s `ls` output.
//!
//! Example output:
//! ```text
//!   .                                   D        0  Sun Oct 18 10:00:00 2026
//!   ..                                  D        0  Sun Oct 18 10:00:00 2026
//!   a.txt                               A       10  Sun Oct 18 10:02:13 2026
//!   My Folder                           D        0  Tue Mar  5 08:01:00 2024
//!
//!                 61202244 blocks of size 1024. 12345678 blocks available
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// One parsed `ls` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedItem {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

fn ls_line_regex() -> &'static Regex {
    static LS_LINE: OnceLock<Regex> = OnceLock::new();
    LS_LINE.get_or_init(|| {
        Regex::new(
            r"^  (?P<name>.*?)\s+(?P<attrs>[A-Z]*)\s+(?P<size>\d+)\s+[A-Z][a-z]{2} (?P<date>[A-Z][a-z]{2} +\d{1,2} \d{2}:\d{2}:\d{2} \d{4})\s*$",
        )
        .unwrap_or_else(|e| panic!("ls line pattern failed to compile: {e}"))
    })
}

/// Parses the listing lines, skipping `.`, `..`, headers, and the free-space footer.
///
/// Items come back in the order `smbclient` printed them. Times are read as UTC, which
/// holds because the lister runs `smbclient` with `TZ=UTC`.
pub fn parse_ls_output(output: &str) -> Vec<ListedItem> {
    let pattern = ls_line_regex();
    let mut items = Vec::new();

    for line in output.lines() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        let name = &caps["name"];
        if name == "." || name == ".." {
            continue;
        }
        let Ok(size) = caps["size"].parse::<u64>() else {
            log::debug!("smbclient: size out of range in line {:?}", line);
            continue;
        };
        let Some(last_modified) = parse_ls_date(&caps["date"]) else {
            log::debug!("smbclient: unparseable date in line {:?}", line);
            continue;
        };
        items.push(ListedItem {
            name: name.to_string(),
            is_directory: caps["attrs"].contains('D'),
            size,
            last_modified,
        });
    }

    items
}

/// Parses `Oct 18 10:02:13 2026` (day may be space-padded).
fn parse_ls_date(date: &str) -> Option<DateTime<Utc>> {
    let squeezed = date.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&squeezed, "%b %d %H:%M:%S %Y")
        .ok()
        .map(|naive| naive.and_utc())
}
