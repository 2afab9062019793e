//! Sort provider for directory listings.
//!
//! [SortOptions::compare] is the pluggable comparison used by the listing
//! worker. Directories stay on top when `dirs_first` is set; `reversed` flips
//! the order inside each group, never the grouping itself.

use crate::core::FileEntry;

use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    #[default]
    Name,
    Size,
    Date,
    Type,
    Natural,
}

impl SortKind {
    pub const ALL: [SortKind; 5] = [
        SortKind::Name,
        SortKind::Size,
        SortKind::Date,
        SortKind::Type,
        SortKind::Natural,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKind::Name => "Name",
            SortKind::Size => "Size",
            SortKind::Date => "Date",
            SortKind::Type => "Type",
            SortKind::Natural => "Natural",
        }
    }

    /// The kind after this one, wrapping around.
    pub fn next(self) -> SortKind {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    pub kind: SortKind,
    pub reversed: bool,
    pub case_sensitive: bool,
    pub dirs_first: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            kind: SortKind::Name,
            reversed: false,
            case_sensitive: false,
            dirs_first: true,
        }
    }
}

impl SortOptions {
    pub fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        if self.dirs_first && a.is_dir() != b.is_dir() {
            return if a.is_dir() {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        let ord = match self.kind {
            SortKind::Name => self.name_cmp(a, b),
            SortKind::Natural => self.natural_name_cmp(a, b),
            SortKind::Size => a.size().cmp(&b.size()).then_with(|| self.name_cmp(a, b)),
            // Newest first
            SortKind::Date => b
                .modified()
                .cmp(&a.modified())
                .then_with(|| self.name_cmp(a, b)),
            SortKind::Type => a
                .extension()
                .cmp(&b.extension())
                .then_with(|| self.name_cmp(a, b)),
        };

        if self.reversed { ord.reverse() } else { ord }
    }

    pub fn sort(&self, entries: &mut [FileEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    fn name_cmp(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        if self.case_sensitive {
            a.name().cmp(b.name())
        } else {
            a.name_str()
                .to_lowercase()
                .cmp(&b.name_str().to_lowercase())
        }
    }

    fn natural_name_cmp(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        if self.case_sensitive {
            natural_cmp(&a.name_str(), &b.name_str())
        } else {
            natural_cmp(&a.name_str().to_lowercase(), &b.name_str().to_lowercase())
        }
    }
}

/// Compares strings treating runs of ASCII digits as numbers, so "file2"
/// sorts before "file10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let (na, rest_a) = split_digits(a);
                let (nb, rest_b) = split_digits(b);
                let ord = compare_numeric(na, nb);
                if ord != Ordering::Equal {
                    return ord;
                }
                a = rest_a;
                b = rest_b;
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                a = &a[ca.len_utf8()..];
                b = &b[cb.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Numeric comparison of digit runs of any length; leading zeros break ties.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let ta = a.trim_start_matches('0');
    let tb = b.trim_start_matches('0');
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::time::{Duration, SystemTime};

    fn file(name: &str, size: u64, age_secs: u64) -> FileEntry {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 - age_secs);
        FileEntry::new(OsString::from(name), 0, size, Some(modified))
    }

    fn dir(name: &str) -> FileEntry {
        FileEntry::new(OsString::from(name), FileEntry::IS_DIR, 0, None)
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name_str().into_owned()).collect()
    }

    #[test]
    fn name_sort_dirs_first_and_reversed() {
        let mut entries = vec![file("b.txt", 1, 0), dir("zdir"), file("A.txt", 1, 0), dir("adir")];
        let mut opts = SortOptions::default();
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["adir", "zdir", "A.txt", "b.txt"]);

        opts.reversed = true;
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["zdir", "adir", "b.txt", "A.txt"]);

        opts.reversed = false;
        opts.case_sensitive = true;
        opts.dirs_first = false;
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["A.txt", "adir", "b.txt", "zdir"]);
    }

    #[test]
    fn size_date_and_type() {
        let mut entries = vec![file("big.rs", 300, 10), file("small.md", 1, 5), file("mid.rs", 20, 50)];
        let mut opts = SortOptions {
            kind: SortKind::Size,
            ..SortOptions::default()
        };
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["small.md", "mid.rs", "big.rs"]);

        opts.kind = SortKind::Date;
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["small.md", "big.rs", "mid.rs"]);

        opts.kind = SortKind::Type;
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["small.md", "big.rs", "mid.rs"]);
    }

    #[test]
    fn natural_order() {
        let mut entries = vec![file("file10", 0, 0), file("file2", 0, 0), file("file1", 0, 0)];
        let opts = SortOptions {
            kind: SortKind::Natural,
            ..SortOptions::default()
        };
        opts.sort(&mut entries);
        assert_eq!(names(&entries), ["file1", "file2", "file10"]);

        assert_eq!(natural_cmp("a01", "a1"), Ordering::Greater);
        assert_eq!(natural_cmp("x9y", "x10y"), Ordering::Less);
        assert_eq!(natural_cmp("img", "img2"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn kind_cycles() {
        assert_eq!(SortKind::Name.next(), SortKind::Size);
        assert_eq!(SortKind::Natural.next(), SortKind::Name);
    }
}
