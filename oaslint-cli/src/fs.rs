//! A `std::fs`-backed [`Filesystem`] for running the engine against a real
//! workspace on disk.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use oaslint_analysis::fs::EntryKind;
use oaslint_analysis::fs::Filesystem;
use oaslint_analysis::fs::Stat;
use oaslint_syntax::IoError;
use path_clean::PathClean;
use url::Url;

/// Converts a `file://` URI into a filesystem path.
fn uri_to_path(uri: &str) -> Result<PathBuf, IoError> {
    let url = Url::parse(uri).map_err(|_| IoError::UnsupportedFormat(uri.to_string()))?;
    url.to_file_path()
        .map_err(|()| IoError::UnsupportedFormat(uri.to_string()))
}

/// Converts a filesystem path into a normalised `file://` URI.
pub fn path_to_uri(path: &Path) -> Result<String, IoError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| IoError::ReadFailed {
                uri: path.display().to_string(),
                reason: e.to_string(),
            })?
            .join(path)
    }
    .clean();
    Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .map_err(|()| IoError::UnsupportedFormat(absolute.display().to_string()))
}

/// The reference [`Filesystem`] implementation, backed directly by
/// `std::fs`, `walkdir` and `glob` (§6, `[AMBIENT]`).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn read(&self, uri: &str) -> Result<Vec<u8>, IoError> {
        let path = uri_to_path(uri)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IoError::NotFound(uri.to_string())
            } else {
                IoError::ReadFailed {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    fn stat(&self, uri: &str) -> Option<Stat> {
        let path = uri_to_path(uri).ok()?;
        let meta = fs::metadata(&path).ok()?;
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Some(Stat {
            kind,
            size: meta.len(),
        })
    }

    fn read_directory(&self, uri: &str) -> Result<Vec<(String, EntryKind)>, IoError> {
        let path = uri_to_path(uri)?;
        let mut out = Vec::new();
        let entries = fs::read_dir(&path).map_err(|e| IoError::ReadFailed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::ReadFailed {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => EntryKind::Directory,
                Ok(ft) if ft.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(_) => EntryKind::Other,
            };
            let child_uri = path_to_uri(&entry.path())?;
            out.push((child_uri, kind));
        }
        Ok(out)
    }

    fn glob(&self, patterns: &[String]) -> Result<Vec<String>, IoError> {
        let mut included = Vec::new();
        let mut excluded = std::collections::HashSet::new();

        for pattern in patterns {
            let (negated, pattern) = match pattern.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, pattern.as_str()),
            };
            let paths = glob::glob(pattern)
                .map_err(|e| IoError::UnsupportedFormat(e.to_string()))?
                .filter_map(Result::ok);
            for path in paths {
                if !path.is_file() {
                    continue;
                }
                let uri = path_to_uri(&path)?;
                if negated {
                    excluded.insert(uri);
                } else {
                    included.push(uri);
                }
            }
        }

        included.retain(|uri| !excluded.contains(uri));
        included.sort();
        included.dedup();
        Ok(included)
    }
}

/// Walks `root` recursively and returns the `file://` URI of every regular
/// file whose extension is `.json`, `.yaml` or `.yml` (the CLI's own entry
/// point into a workspace, independent of [`Filesystem::glob`]'s
/// pattern-driven discovery).
pub fn discover_documents(root: &Path) -> Result<Vec<String>, IoError> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry.path().extension().and_then(|e| e.to_str());
        if matches!(ext, Some("json") | Some("yaml") | Some("yml")) {
            out.push(path_to_uri(entry.path())?);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, b"{}").unwrap();
        let uri = path_to_uri(&file).unwrap();

        let fs = StdFilesystem;
        assert_eq!(fs.read(&uri).unwrap(), b"{}");
        assert!(fs.stat(&uri).is_some());
    }

    #[test]
    fn missing_file_is_not_found() {
        let fs = StdFilesystem;
        let uri = path_to_uri(Path::new("/no/such/file.json")).unwrap();
        assert!(matches!(fs.read(&uri), Err(IoError::NotFound(_))));
    }

    #[test]
    fn discover_documents_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.json"), b"{}").unwrap();
        fs::write(dir.path().join("nested/b.yaml"), b"{}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let found = discover_documents(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
    }
}
