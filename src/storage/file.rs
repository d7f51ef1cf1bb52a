use super::StoragePort;
use crate::error::{Result, RiskMatrixError};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Sidecar holding the original key of a hashed file name.
const KEY_EXTENSION: &str = "key";

/// Longest escaped key used verbatim as a file stem. File systems cap names
/// at 255 bytes and the extension and temp suffix need room.
const MAX_STEM_LEN: usize = 200;

/// Marks a stem derived from a key hash. Never produced by `escape_key`.
const HASHED_PREFIX: char = '~';

/// Directory-backed store: one `<escaped key>.json` file per key.
///
/// Keys may contain any characters; everything outside `[A-Za-z0-9_.-]` is
/// percent-escaped in the file name. Keys whose escaped form is too long for
/// a file name are stored as `~<sha256>.json` with the key itself in a
/// `~<sha256>.key` sidecar. Writes go through a temporary file and a rename
/// so a crash never leaves a half-written record behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RiskMatrixError::from_io_error(e, Some(root.clone())))?;
        log::debug!("opened file store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", file_stem(key), EXTENSION))
    }

    fn key_path_for(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{}.{}", stem, KEY_EXTENSION))
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        fs::write(&tmp, contents).map_err(|e| RiskMatrixError::from_io_error(e, Some(tmp.clone())))?;
        fs::rename(&tmp, path)
            .map_err(|e| RiskMatrixError::from_io_error(e, Some(path.to_path_buf())))?;
        Ok(())
    }

    fn key_for_stem(&self, stem: &str) -> Result<Option<String>> {
        if !stem.starts_with(HASHED_PREFIX) {
            return Ok(unescape_key(stem));
        }
        let key_path = self.key_path_for(stem);
        match fs::read_to_string(&key_path) {
            Ok(key) => Ok(Some(key)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RiskMatrixError::from_io_error(e, Some(key_path))),
        }
    }
}

impl StoragePort for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RiskMatrixError::from_io_error(e, Some(path))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let stem = file_stem(key);
        if stem.starts_with(HASHED_PREFIX) {
            self.write_atomic(&self.key_path_for(&stem), key)?;
        }
        let path = self.path_for(key);
        self.write_atomic(&path, value)?;
        log::trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        let removed = remove_if_present(&path)?;
        let stem = file_stem(key);
        if stem.starts_with(HASHED_PREFIX) {
            remove_if_present(&self.key_path_for(&stem))?;
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| RiskMatrixError::from_io_error(e, Some(self.root.clone())))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RiskMatrixError::from_io_error(e, Some(self.root.clone())))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.key_for_stem(stem)? {
                Some(key) => keys.push(key),
                None => log::warn!("ignoring unrecognised file {}", path.display()),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(RiskMatrixError::from_io_error(e, Some(path.to_path_buf()))),
    }
}

/// File stem for `key`: the escaped key, or a hash when that is too long.
fn file_stem(key: &str) -> String {
    let escaped = escape_key(key);
    if escaped.len() <= MAX_STEM_LEN {
        return escaped;
    }
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{}{:x}", HASHED_PREFIX, hasher.finalize())
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.')
}

fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        if is_plain(byte) {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}

fn unescape_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_round_trip() {
        for key in ["assessment_Acme v. Widgets", "a/b\\c", "ümlaut %", "plain-key_1.0"] {
            let escaped = escape_key(key);
            assert!(escaped.bytes().all(|b| is_plain(b) || b == b'%'));
            assert_eq!(unescape_key(&escaped).as_deref(), Some(key));
        }
        assert_eq!(escape_key("a b"), "a%20b");
    }

    #[test]
    fn test_unescape_rejects_truncated_sequences() {
        assert_eq!(unescape_key("abc%2"), None);
        assert_eq!(unescape_key("abc%zz"), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("nested").join("store")).unwrap();
        store.set("assessment_Acme v. Widgets", "{}").unwrap();

        let reopened = FileStore::open(store.root()).unwrap();
        assert_eq!(
            reopened.get("assessment_Acme v. Widgets").unwrap(),
            Some("{}".to_string())
        );
        assert_eq!(reopened.keys().unwrap(), vec!["assessment_Acme v. Widgets"]);
    }

    #[test]
    fn test_file_store_remove_and_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_long_keys_use_bounded_file_names() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let long = format!(
            "assessment_{}",
            "Acme Holdings v. Widgets International et al. ".repeat(5)
        );
        let wide = format!("assessment_{}", "株式会社ウィジェット対アクメ".repeat(4));

        for key in [&long, &wide] {
            assert!(escape_key(key).len() > 255);
            store.set(key, "{}").unwrap();
            assert_eq!(store.get(key).unwrap(), Some("{}".to_string()));
        }
        for entry in fs::read_dir(dir.path()).unwrap() {
            assert!(entry.unwrap().file_name().len() < 255);
        }

        let mut expected = vec![long.clone(), wide.clone()];
        expected.sort();
        assert_eq!(store.keys().unwrap(), expected);

        store.set(&long, "{\"v\":2}").unwrap();
        assert_eq!(store.get(&long).unwrap(), Some("{\"v\":2}".to_string()));

        assert!(store.remove(&long).unwrap());
        assert!(store.remove(&wide).unwrap());
        assert!(store.keys().unwrap().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_short_keys_keep_readable_names() {
        assert_eq!(file_stem("assessment_Acme"), "assessment_Acme");
        let hashed = file_stem(&"x".repeat(MAX_STEM_LEN + 1));
        assert!(hashed.starts_with(HASHED_PREFIX));
        assert_eq!(hashed.len(), 65);
    }

    #[test]
    fn test_keys_skip_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["k"]);
    }
}
