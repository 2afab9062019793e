//! Directory listing provider.
//!
//! [browse_dir] reads one directory into [FileEntry] values: name, a flag
//! byte, size and modification time. Sorting and filtering live in
//! [crate::core::sort] and in the worker that runs the listing.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: Box<OsStr>,
    flags: u8,
    size: u64,
    modified: Option<SystemTime>,
}

impl FileEntry {
    pub const IS_DIR: u8 = 1 << 0;
    pub const IS_HIDDEN: u8 = 1 << 1;
    pub const IS_SYMLINK: u8 = 1 << 2;
    pub const IS_BROKEN_SYM: u8 = 1 << 3;
    pub const IS_EXECUTABLE: u8 = 1 << 4;

    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    pub fn new(name: OsString, flags: u8, size: u64, modified: Option<SystemTime>) -> Self {
        FileEntry {
            name: name.into_boxed_os_str(),
            flags,
            size,
            modified,
        }
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Self::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_broken_sym(&self) -> bool {
        self.flags & Self::IS_BROKEN_SYM != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Self::IS_EXECUTABLE != 0
    }

    /// Lowercased extension, empty for directories and extensionless files.
    pub fn extension(&self) -> String {
        if self.is_dir() {
            return String::new();
        }
        Path::new(&*self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Reads the entries of `path`. Entries that vanish or can't be stat'ed
/// during the read are skipped.
pub fn browse_dir(path: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(256);

    for entry in fs::read_dir(path)? {
        let Ok(entry) = entry else {
            continue;
        };
        let Ok(ft) = entry.file_type() else {
            continue;
        };

        let name = entry.file_name();
        let mut flags = 0u8;
        if ft.is_dir() {
            flags |= FileEntry::IS_DIR;
        }
        if ft.is_symlink() {
            flags |= FileEntry::IS_SYMLINK;
        }

        // Follow symlinks so a link to a directory sorts and opens as one
        let md = if ft.is_symlink() {
            fs::metadata(entry.path())
        } else {
            entry.metadata()
        };

        let (size, modified) = match &md {
            Ok(md) => {
                if md.is_dir() {
                    flags |= FileEntry::IS_DIR;
                }
                (if md.is_dir() { 0 } else { md.len() }, md.modified().ok())
            }
            Err(_) => {
                if ft.is_symlink() {
                    flags |= FileEntry::IS_BROKEN_SYM;
                }
                (0, None)
            }
        };

        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            use std::os::unix::fs::PermissionsExt;

            if let Ok(md) = &md
                && !md.is_dir()
                && md.permissions().mode() & FileEntry::EXEC_FLAG != 0
            {
                flags |= FileEntry::IS_EXECUTABLE;
            }
            if name.as_bytes().first() == Some(&b'.') {
                flags |= FileEntry::IS_HIDDEN;
            }
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::MetadataExt;
            if let Ok(md) = entry.metadata()
                && md.file_attributes() & 0x2 != 0
            {
                flags |= FileEntry::IS_HIDDEN;
            }
            if let Some(ext) = Path::new(&name).extension().and_then(|e| e.to_str())
                && matches!(
                    ext.to_ascii_lowercase().as_str(),
                    "exe" | "com" | "bat" | "cmd" | "ps1"
                )
            {
                flags |= FileEntry::IS_EXECUTABLE;
            }
        }

        entries.push(FileEntry::new(name, flags, size, modified));
    }
    Ok(entries)
}

/// Joins an entry name onto its directory.
pub fn entry_path(dir: &Path, entry: &FileEntry) -> PathBuf {
    dir.join(entry.name())
}
