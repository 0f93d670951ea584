//! Container formats behind [`EntrySource`]
//!
//! Each source keeps only the archive path and reopens the file at the
//! start of every scan.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use sevenz_rust2::{ArchiveReader, Password};
use tracing::debug;
use zip::ZipArchive;

use crate::archive::{ArchiveEntry, EntrySource, ScanFlow, Visitor};
use crate::common::paths;
use crate::error::archive::{corrupt, open_failed};
use crate::error::{ModlayerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Zip,
    SevenZ,
    Tar,
    TarGz,
    /// Recognized but not readable
    Rar,
}

impl Format {
    /// Detect the format from the file name
    pub fn from_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".7z") {
            Some(Self::SevenZ)
        } else if name.ends_with(".rar") {
            Some(Self::Rar)
        } else {
            None
        }
    }

    /// Detect the format from leading magic bytes
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        if head.starts_with(b"PK\x03\x04") || head.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if head.starts_with(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]) {
            Some(Self::SevenZ)
        } else if head.starts_with(&[0x1F, 0x8B]) {
            Some(Self::TarGz)
        } else if head.starts_with(b"Rar!\x1A\x07") {
            Some(Self::Rar)
        } else if head.get(257..262) == Some(b"ustar".as_slice()) {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

fn sniff(path: &Path) -> Result<Option<Format>> {
    let mut head = Vec::with_capacity(512);
    File::open(path)
        .and_then(|f| f.take(512).read_to_end(&mut head))
        .map_err(|e| open_failed(path, e))?;
    Ok(Format::from_magic(&head))
}

/// Pick and validate the source for `path`
pub fn open_source(path: &Path) -> Result<Box<dyn EntrySource>> {
    if !path.is_file() {
        return Err(open_failed(path, "no such file"));
    }
    let format = match Format::from_name(path) {
        Some(format) => format,
        None => sniff(path)?.ok_or_else(|| unsupported(path))?,
    };
    debug!(archive = %path.display(), ?format, "Opening archive");

    let path = path.to_path_buf();
    match format {
        Format::Zip => {
            zip_reader(&path)?;
            Ok(Box::new(ZipSource { path }))
        }
        Format::SevenZ => {
            sevenz_reader(&path)?;
            Ok(Box::new(SevenZSource { path }))
        }
        Format::Tar => Ok(Box::new(TarSource { path, gzip: false })),
        Format::TarGz => Ok(Box::new(TarSource { path, gzip: true })),
        Format::Rar => Err(unsupported(&path)),
    }
}

fn unsupported(path: &Path) -> ModlayerError {
    ModlayerError::UnsupportedArchive {
        path: path.display().to_string(),
    }
}

fn zip_reader(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|e| open_failed(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| open_failed(path, e))
}

fn sevenz_reader(path: &Path) -> Result<ArchiveReader<File>> {
    let file = File::open(path).map_err(|e| open_failed(path, e))?;
    ArchiveReader::new(file, Password::empty()).map_err(|e| open_failed(path, e))
}

/// `.zip` through the `zip` crate
pub struct ZipSource {
    path: PathBuf,
}

impl EntrySource for ZipSource {
    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()> {
        let mut archive = zip_reader(&self.path)?;
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| corrupt(format!("entry #{index}"), e))?;
            let mut entry = ArchiveEntry {
                name: paths::to_unix(file.name()),
                is_dir: file.is_dir(),
                reader: &mut file,
            };
            if visit(&mut entry)? == ScanFlow::Stop {
                break;
            }
        }
        Ok(())
    }
}

/// `.tar`, optionally gzip-compressed
pub struct TarSource {
    path: PathBuf,
    gzip: bool,
}

impl EntrySource for TarSource {
    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| open_failed(&self.path, e))?;
        let reader: Box<dyn Read> = if self.gzip {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        let mut archive = tar::Archive::new(reader);
        let entries = archive
            .entries()
            .map_err(|e| open_failed(&self.path, e))?;

        for item in entries {
            let mut item = item.map_err(|e| corrupt(self.path.display().to_string(), e))?;
            let kind = item.header().entry_type();
            if !kind.is_file() && !kind.is_dir() {
                continue;
            }
            let name = item
                .path()
                .map(|p| paths::to_unix(&p.to_string_lossy()))
                .map_err(|e| corrupt(self.path.display().to_string(), e))?;
            let mut entry = ArchiveEntry {
                name,
                is_dir: kind.is_dir(),
                reader: &mut item,
            };
            if visit(&mut entry)? == ScanFlow::Stop {
                break;
            }
        }
        Ok(())
    }
}

/// `.7z` through `sevenz-rust2`
pub struct SevenZSource {
    path: PathBuf,
}

impl EntrySource for SevenZSource {
    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()> {
        let mut archive = sevenz_reader(&self.path)?;
        let mut failure = None;

        archive
            .for_each_entries(|meta, data| {
                let mut entry = ArchiveEntry {
                    name: paths::to_unix(meta.name()),
                    is_dir: meta.is_directory(),
                    reader: &mut *data,
                };
                match visit(&mut entry) {
                    Ok(ScanFlow::Continue) => {
                        // Solid blocks are decoded in order; drain what the visitor left
                        if let Err(e) = io::copy(data, &mut io::sink()) {
                            failure = Some(corrupt(meta.name(), e));
                            return Ok(false);
                        }
                        Ok(true)
                    }
                    Ok(ScanFlow::Stop) => Ok(false),
                    Err(e) => {
                        failure = Some(e);
                        Ok(false)
                    }
                }
            })
            .map_err(|e| corrupt(self.path.display().to_string(), e))?;

        failure.map_or(Ok(()), Err)
    }
}
