//! Catalog origins: the backend endpoint, remote snapshots, local snapshots.
//!
//! Every origin yields the raw JSON document; shape extraction and field
//! normalization happen in [`crate::catalog`] so that all origins go through
//! the same pipeline.

use crate::error::{Result, ShopError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single place the catalog can be read from.
pub trait CatalogSource {
    /// Human-readable origin, used in logs and notices.
    fn name(&self) -> String;

    /// Read and parse the raw catalog document.
    ///
    /// Any network, status or parse failure is an `Err`; the caller decides
    /// whether to move on to the next source.
    fn fetch(&self) -> Result<Value>;
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// `GET <url>` with `Accept: application/json`.
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Value> {
        debug!(url = %self.url, "requesting catalog");
        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ShopError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let text = resp.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// A snapshot file on disk. Files ending in `.gz` are decompressed on read.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Value> {
        if !self.path.exists() {
            return Err(ShopError::NotFound(format!(
                "snapshot {} does not exist",
                self.path.display()
            )));
        }

        let contents = if is_gzip(&self.path) {
            let file = fs::File::open(&self.path)?;
            let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            reader.read_to_string(&mut contents)?;
            contents
        } else {
            fs::read_to_string(&self.path)?
        };

        Ok(serde_json::from_str(&contents)?)
    }
}

// ---------------------------------------------------------------------------
// Snapshot writing
// ---------------------------------------------------------------------------

/// Write a catalog document to `dest` as pretty JSON, gzipped when `dest`
/// ends in `.gz` so that [`FileSource`] reads it back.
///
/// Writes to a temp file first and renames on success, so an interrupted
/// write never leaves a truncated snapshot behind for the fallback path.
pub fn write_snapshot<T: serde::Serialize>(dest: &Path, document: &T) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_dest = dest.with_extension(format!(
        "{}.tmp",
        dest.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));

    let result = (|| -> Result<()> {
        let body = serde_json::to_vec_pretty(document)?;
        if is_gzip(dest) {
            let mut encoder = GzEncoder::new(fs::File::create(&tmp_dest)?, Compression::default());
            encoder.write_all(&body)?;
            encoder.finish()?.sync_all()?;
        } else {
            fs::write(&tmp_dest, body)?;
        }
        fs::rename(&tmp_dest, dest)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_dest);
    }

    result
}
