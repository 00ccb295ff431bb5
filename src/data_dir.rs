use crate::errors::DirectoryError;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lines whose first non-blank character is this marker are comments.
pub const DEFAULT_COMMENT_CHAR: char = '#';

/// A read-only view of the database directory.
///
/// The directory is validated and its top-level entries are listed once, when
/// the view is opened. Later lookups work from that snapshot.
#[derive(Debug)]
pub struct DataDirectory {
    root: PathBuf,
    entries: Vec<PathBuf>,
    comment_char: char,
}

impl DataDirectory {
    /// Opens the directory at `path`, failing if it does not exist, is not a
    /// directory, or cannot be listed.
    pub fn open<P: AsRef<Path>>(path: P, comment_char: char) -> Result<Self, DirectoryError> {
        let raw = path.as_ref().to_string_lossy();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryError::EmptyPath);
        }

        let root = PathBuf::from(trimmed);
        if !root.exists() {
            return Err(DirectoryError::NotFound(root));
        }
        if !root.is_dir() {
            return Err(DirectoryError::NotADirectory(root));
        }

        let mut entries = Vec::new();
        let listing = match fs::read_dir(&root) {
            Ok(listing) => listing,
            Err(err) => return Err(DirectoryError::Unreadable(root, err)),
        };
        for entry in listing {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                Err(err) => return Err(DirectoryError::Unreadable(root, err)),
            }
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        info!(
            "opened data directory {} ({} entries)",
            root.display(),
            entries.len()
        );

        Ok(Self {
            root,
            entries,
            comment_char,
        })
    }

    /// All top-level files and subdirectories, sorted by name.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Finds the entry whose file name is exactly `name`.
    pub fn entry_by_name(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|entry| entry.file_name().map_or(false, |n| n == name))
            .map(PathBuf::as_path)
    }

    /// Reads the lines of the named entry. A name that matches nothing reads
    /// as an empty file.
    pub fn read_lines(
        &self,
        name: &str,
        drop_comments: bool,
        drop_empty: bool,
    ) -> io::Result<Vec<String>> {
        match self.entry_by_name(name) {
            Some(path) => self.read_lines_from(path, drop_comments, drop_empty),
            None => {
                debug!("{} not found in {}", name, self.root.display());
                Ok(Vec::new())
            }
        }
    }

    /// Reads the lines of `path` in file order, optionally dropping blank
    /// lines and comment lines. Kept lines are returned untrimmed. Anything
    /// that is not a regular file, or that we may not read, reads as empty.
    /// Bytes that are not valid UTF-8 are replaced rather than failing the
    /// whole file.
    pub fn read_lines_from(
        &self,
        path: &Path,
        drop_comments: bool,
        drop_empty: bool,
    ) -> io::Result<Vec<String>> {
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let file = match readable(File::open(path), path)? {
            Some(file) => file,
            None => return Ok(Vec::new()),
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.ends_with(b"\n") {
                buf.pop();
                if buf.ends_with(b"\r") {
                    buf.pop();
                }
            }

            let line = String::from_utf8_lossy(&buf);
            let trimmed = line.trim();

            if drop_empty && trimmed.is_empty() {
                continue;
            }
            if drop_comments && trimmed.starts_with(self.comment_char) {
                continue;
            }

            lines.push(line.into_owned());
        }

        Ok(lines)
    }
}

/// Treats a file we are not allowed to open as absent.
fn readable(opened: io::Result<File>, path: &Path) -> io::Result<Option<File>> {
    match opened {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            warn!("skipping unreadable file {}: {}", path.display(), err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
