//! Storage backends for the cache store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use dca_core::error::CacheError;

/// Raw key/value storage medium underneath the cache store.
///
/// Backends store opaque strings; TTL, namespacing, and eviction live in
/// [`crate::CacheStore`]. A backend may reject a write for its own capacity
/// reasons (quota), which the store handles by evicting and retrying.
pub trait StorageBackend: Send {
    /// Read the raw value for a key, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a raw value, replacing any existing one.
    fn write(&mut self, key: &str, raw: &str) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CacheError>;

    /// List every stored key, in no particular order.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// In-memory backend with an optional byte quota.
///
/// The quota models a storage medium that rejects writes once full, the way
/// browser local storage does. `None` means unbounded.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota_bytes: Option<u64>,
}

impl MemoryBackend {
    /// Create an unbounded in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes pushing it over `quota_bytes`.
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn total_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), CacheError> {
        if let Some(quota) = self.quota_bytes {
            let existing = self.entries.get(key).map_or(0, |v| (key.len() + v.len()) as u64);
            let needed = (key.len() + raw.len()) as u64;
            if self.total_bytes() - existing + needed > quota {
                return Err(CacheError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// File-per-key backend rooted at a cache directory.
///
/// Keys are percent-encoded into file names, so any key round-trips even if
/// it contains path separators or punctuation.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open a file backend, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Storage(e.to_string())),
        }
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), CacheError> {
        fs::write(self.path_for(key), raw).map_err(|e| CacheError::Storage(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Storage(e.to_string())),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| CacheError::Storage(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Storage(e.to_string()))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(encoded) = name.strip_suffix(".json") {
                if let Some(key) = decode_key(encoded) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}

/// Percent-encode a key into a safe file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'_' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Invert [`encode_key`]; `None` for malformed input.
fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
