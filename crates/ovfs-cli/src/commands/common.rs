//! Report types shared by the listing commands.

use chrono::{DateTime, SecondsFormat, Utc};
use ovfs_core::{Metadata, VfsPath};
use serde::Serialize;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory
    Dir,
    /// Regular file (or anything that is not a directory)
    File,
}

/// One entry as reported by `ls` and `stat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    /// Base name
    pub name: String,
    /// Absolute virtual path
    pub path: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Content length in bytes, uncompressed for gzip entries
    pub size: u64,
    /// Modification time in RFC 3339
    pub modified: String,
    /// Whether the embedded payload is gzip-encoded
    pub gzip: bool,
}

impl EntryInfo {
    /// Builds the report for `info` found at `path`.
    #[must_use]
    pub fn new(path: &VfsPath, info: &Metadata) -> Self {
        Self {
            name: info.name().to_string(),
            path: path.to_string(),
            kind: if info.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            },
            size: info.size(),
            modified: DateTime::<Utc>::from(info.mod_time())
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            gzip: info.is_gzip(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovfs_core::Node;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_entry_info_from_node() {
        let path = VfsPath::new("/docs/a.txt").unwrap();
        let mod_time = UNIX_EPOCH + Duration::from_secs(60);
        let node = Node::file(path.clone(), b"hello".to_vec(), mod_time);

        let entry = EntryInfo::new(&path, &node.metadata());
        assert_eq!(entry.name, "a.txt");
        assert_eq!(entry.path, "/docs/a.txt");
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 5);
        assert_eq!(entry.modified, "1970-01-01T00:01:00Z");
        assert!(!entry.gzip);
    }

    #[test]
    fn test_entry_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EntryKind::Dir).unwrap(), "\"dir\"");
        assert_eq!(serde_json::to_string(&EntryKind::File).unwrap(), "\"file\"");
    }
}
