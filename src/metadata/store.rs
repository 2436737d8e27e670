//! Metadata persistence keyed by token number

use crate::io::context::RunContext;
use crate::io::error::{ForgeError, Result, WithPath};
use crate::metadata::record::TokenMetadata;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of metadata documents
pub const METADATA_EXTENSION: &str = "json";

/// Write `path` through a sibling `.partial` file renamed into place
///
/// Returns `Ok(false)` without writing when the target exists and `overwrite`
/// is off. A failed write removes the partial file, so the target is either
/// absent or complete and a rerun regenerates it.
///
/// # Errors
///
/// Returns [`ForgeError::FileSystem`] if the partial file cannot be created
/// or renamed, and any error of `write`.
pub fn write_output<F>(path: &Path, overwrite: bool, write: F) -> Result<bool>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if !overwrite && path.exists() {
        return Ok(false);
    }

    let partial = partial_path(path);
    let written = File::create(&partial)
        .with_path(&partial, "create output")
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush().with_path(&partial, "flush output")
        });
    if let Err(err) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(err);
    }

    std::fs::rename(&partial, path).with_path(path, "rename output")?;
    Ok(true)
}

/// `{name}.partial` next to `path`; never matches a numbered listing
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Serialize `value` with four-space indentation
///
/// # Errors
///
/// Returns [`ForgeError::Metadata`] if serialization fails and
/// [`ForgeError::FileSystem`] if the writer fails.
pub fn write_json<T: Serialize, W: Write>(writer: W, value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer).with_path(path, "serialize")?;
    writer.flush().with_path(path, "flush")
}

/// List `{n}.{ext}` files of a directory sorted by numeric value
///
/// Entries whose stem is not an integer are ignored, so `10.json` sorts
/// after `2.json`.
///
/// # Errors
///
/// Returns [`ForgeError::FileSystem`] if the directory cannot be read.
pub fn list_numbered(dir: &Path, extension: &str) -> Result<Vec<(u64, PathBuf)>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_path(dir, "read directory")? {
        let path = entry.with_path(dir, "read directory entry")?.path();
        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }
        let Some(token) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok())
        else {
            continue;
        };
        files.push((token, path));
    }
    files.sort_by_key(|(token, _)| *token);
    Ok(files)
}

/// Outcome of persisting one batch of records
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Tokens written
    pub written: Vec<u64>,
    /// Tokens left untouched because their file existed
    pub skipped: Vec<u64>,
    /// Records rejected, keyed by display name
    pub failed: Vec<(String, ForgeError)>,
}

/// Result of persisting a single record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Document written for this token
    Written(u64),
    /// Document existed and was kept
    Skipped(u64),
}

/// Directory of `{token}.json` metadata documents
#[derive(Clone, Debug)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    /// Store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Document path of a token
    pub fn path_for(&self, token: u64) -> PathBuf {
        self.dir.join(format!("{token}.{METADATA_EXTENSION}"))
    }

    /// Persist one record
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Consistency`] when the record's identity fields
    /// disagree, or the write errors of [`write_json`].
    pub fn save(&self, record: &TokenMetadata, overwrite: bool) -> Result<SaveOutcome> {
        let token = record.check_identity()?;
        let path = self.path_for(token);
        if write_output(&path, overwrite, |writer| write_json(writer, record, &path))? {
            Ok(SaveOutcome::Written(token))
        } else {
            Ok(SaveOutcome::Skipped(token))
        }
    }

    /// Persist a batch; a rejected record never stops the others
    pub fn save_batch(
        &self,
        records: &[TokenMetadata],
        overwrite: bool,
        ctx: &RunContext,
    ) -> SaveReport {
        let mut report = SaveReport::default();
        for record in records {
            match self.save(record, overwrite) {
                Ok(SaveOutcome::Written(token)) => {
                    tracing::info!(parent: ctx.span(), record = %record.name, token, "saved metadata");
                    report.written.push(token);
                }
                Ok(SaveOutcome::Skipped(token)) => {
                    tracing::warn!(
                        parent: ctx.span(),
                        token,
                        "metadata already exists, pass --overwrite to replace it"
                    );
                    report.skipped.push(token);
                }
                Err(err) => {
                    tracing::error!(parent: ctx.span(), record = %record.name, error = %err, "rejected metadata");
                    report.failed.push((record.name.clone(), err));
                }
            }
        }
        report
    }

    /// Read a token's record
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::FileSystem`] if the file cannot be opened and
    /// [`ForgeError::Metadata`] if it is not a valid record.
    pub fn load(&self, token: u64) -> Result<TokenMetadata> {
        load_record(&self.path_for(token))
    }

    /// Every `{n}.json` document in numeric order
    ///
    /// # Errors
    ///
    /// See [`list_numbered`].
    pub fn list(&self) -> Result<Vec<(u64, PathBuf)>> {
        list_numbered(&self.dir, METADATA_EXTENSION)
    }
}

/// Read a record from a document path
///
/// # Errors
///
/// Returns [`ForgeError::FileSystem`] if the file cannot be opened and
/// [`ForgeError::Metadata`] if it is not a valid record.
pub fn load_record(path: &Path) -> Result<TokenMetadata> {
    let file = File::open(path).with_path(path, "open metadata")?;
    serde_json::from_reader(BufReader::new(file)).with_path(path, "parse metadata")
}
