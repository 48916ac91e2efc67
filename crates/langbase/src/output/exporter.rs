//! Table exporter and all-or-nothing export batches.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LangbaseError, Result};
use crate::input::Dialect;
use crate::table::Table;

/// Writes a table with a fixed column order and one header row.
///
/// Values are written verbatim; null is an empty field. Quoting is minimal.
#[derive(Debug, Clone)]
pub struct TableExporter {
    columns: Vec<String>,
    dialect: Dialect,
}

impl TableExporter {
    /// Exporter for the given column order.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            dialect: Dialect::CANONICAL,
        }
    }

    /// Write `table` to `output`. Fails if a declared column is missing.
    pub fn write<W: Write>(&self, table: &Table, output: W) -> Result<()> {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        table.require_columns(&columns)?;

        let mut writer = self.dialect.writer_builder().from_writer(output);
        writer.write_record(&self.columns)?;
        for row in &table.rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|c| row.get(c).and_then(|v| v.as_deref()).unwrap_or("")),
            )?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Render `table` to a string.
    pub fn render(&self, table: &Table) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(table, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| LangbaseError::Config(format!("non UTF-8 export: {}", e)))
    }
}

/// A set of files written together: either all land or none do.
///
/// Each file is first written to a `.tmp` sibling. [`ExportBatch::commit`]
/// renames them into place only after every write succeeded, and restores
/// the previous contents of the directory if any rename fails.
#[derive(Debug)]
pub struct ExportBatch {
    dir: PathBuf,
    staged: Vec<(PathBuf, PathBuf)>,
}

impl ExportBatch {
    /// Start a batch in `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| LangbaseError::io(&dir, e))?;
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    /// Stage a table export.
    pub fn add_table(&mut self, file_name: &str, table: &Table, exporter: &TableExporter) -> Result<()> {
        self.stage(file_name, |writer| exporter.write(table, writer))
    }

    /// Stage raw bytes.
    pub fn add_bytes(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(file_name);
        self.stage(file_name, |writer| {
            writer.write_all(bytes).map_err(|e| LangbaseError::io(&path, e))
        })
    }

    fn stage<F>(&mut self, file_name: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        let target = self.dir.join(file_name);
        let temp = self.dir.join(format!("{}.tmp", file_name));

        let result = File::create(&temp)
            .map_err(|e| LangbaseError::io(&temp, e))
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                write(&mut writer)?;
                writer.flush().map_err(|e| LangbaseError::io(&temp, e))
            });

        match result {
            Ok(()) => {
                self.staged.push((temp, target));
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&temp);
                Err(e)
            }
        }
    }

    /// Move every staged file into place. Returns the final paths.
    ///
    /// Files already present at a target are set aside as `.bak` siblings
    /// first. If any rename fails, the targets committed so far are removed
    /// and the set-aside files are moved back before the error is returned.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);
        let mut committed: Vec<Committed> = Vec::with_capacity(staged.len());

        for (index, (temp, target)) in staged.iter().enumerate() {
            match replace(temp, target) {
                Ok(entry) => committed.push(entry),
                Err(e) => {
                    for (pending, _) in &staged[index..] {
                        let _ = fs::remove_file(pending);
                    }
                    for entry in committed.iter().rev() {
                        entry.roll_back();
                    }
                    tracing::warn!(
                        dir = %self.dir.display(),
                        rolled_back = committed.len(),
                        "export commit failed"
                    );
                    return Err(e);
                }
            }
        }

        let written: Vec<PathBuf> = committed.into_iter().map(Committed::finish).collect();
        tracing::info!(dir = %self.dir.display(), files = written.len(), "export committed");
        Ok(written)
    }
}

/// A target that has been renamed into place, with the file it replaced.
#[derive(Debug)]
struct Committed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

impl Committed {
    fn roll_back(&self) {
        let _ = fs::remove_file(&self.target);
        if let Some(backup) = &self.backup {
            if let Err(e) = fs::rename(backup, &self.target) {
                tracing::error!(path = %self.target.display(), error = %e, "could not restore previous file");
            }
        }
    }

    fn finish(self) -> PathBuf {
        if let Some(backup) = &self.backup {
            let _ = fs::remove_file(backup);
        }
        self.target
    }
}

/// Rename `temp` over `target`, setting any existing target aside first.
fn replace(temp: &Path, target: &Path) -> Result<Committed> {
    let backup = if target.exists() {
        let mut name = target.as_os_str().to_os_string();
        name.push(".bak");
        let backup = PathBuf::from(name);
        fs::rename(target, &backup).map_err(|e| LangbaseError::io(target, e))?;
        Some(backup)
    } else {
        None
    };

    match fs::rename(temp, target) {
        Ok(()) => Ok(Committed {
            target: target.to_path_buf(),
            backup,
        }),
        Err(e) => {
            if let Some(backup) = &backup {
                let _ = fs::rename(backup, target);
            }
            Err(LangbaseError::io(target, e))
        }
    }
}

impl Drop for ExportBatch {
    fn drop(&mut self) {
        for (temp, _) in &self.staged {
            let _ = fs::remove_file(temp);
        }
    }
}
