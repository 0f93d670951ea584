//! In-memory entry source for tests

use std::io::{self, Cursor, Read};

use crate::archive::{ArchiveEntry, EntrySource, ScanFlow, Visitor};
use crate::error::Result;

/// Entries held in memory; a name ending in `/` is a directory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<(String, Vec<u8>)>,
    broken: Vec<String>,
}

impl MemorySource {
    pub fn new(entries: &[(&str, &[u8])]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, data)| ((*name).to_string(), data.to_vec()))
                .collect(),
            broken: Vec::new(),
        }
    }

    /// Make reads of `name` fail after its first bytes
    pub fn with_broken(mut self, name: &str) -> Self {
        self.broken.push(name.to_string());
        self
    }
}

/// Yields a few bytes, then an I/O error
struct Truncated<'a> {
    head: &'a [u8],
}

impl Read for Truncated<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.head.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "truncated stream"));
        }
        let n = self.head.len().min(buf.len()).min(3);
        buf[..n].copy_from_slice(&self.head[..n]);
        self.head = &self.head[n..];
        Ok(n)
    }
}

impl EntrySource for MemorySource {
    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()> {
        for (name, data) in &self.entries {
            let mut cursor = Cursor::new(data.as_slice());
            let mut truncated = Truncated { head: data.as_slice() };
            let reader: &mut dyn Read = if self.broken.contains(name) {
                &mut truncated
            } else {
                &mut cursor
            };
            let mut entry = ArchiveEntry {
                name: name.clone(),
                is_dir: name.ends_with('/'),
                reader,
            };
            if visit(&mut entry)? == ScanFlow::Stop {
                break;
            }
        }
        Ok(())
    }
}
