//! Workbook persistence engine.
//!
//! Serializes a workbook in memory, writes it to a temporary file inside the
//! scratch directory and atomically moves it under its final name. A failed
//! generation therefore never leaves a partial file under an artifact name.

use rust_xlsxwriter::Workbook;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::common::XLSX_EXTENSION;
use super::ReportError;

/// Suffixed names tried after a same-second collision.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Stateless engine for saving workbooks into a scratch directory.
pub struct XlsxRenderEngine;

impl XlsxRenderEngine {
    /// Save `workbook` as `<stem>.xlsx` in `dir`, falling back to
    /// `<stem>_1.xlsx`, `<stem>_2.xlsx`, ... when the name is taken.
    ///
    /// Returns the final path and file name.
    pub fn save(
        workbook: &mut Workbook,
        dir: &Path,
        stem: &str,
    ) -> Result<(PathBuf, String), ReportError> {
        let bytes = workbook.save_to_buffer()?;
        Self::persist(&bytes, dir, stem)
    }

    /// Persist already serialized workbook bytes.
    pub fn persist(bytes: &[u8], dir: &Path, stem: &str) -> Result<(PathBuf, String), ReportError> {
        fs::create_dir_all(dir).map_err(ReportError::ScratchDir)?;

        let mut temp = NamedTempFile::new_in(dir).map_err(ReportError::TempFile)?;
        temp.write_all(bytes).map_err(ReportError::WriteArtifact)?;
        temp.flush().map_err(ReportError::WriteArtifact)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = candidate_name(stem, attempt);
            let path = dir.join(&filename);

            match temp.persist_noclobber(&path) {
                Ok(_) => return Ok((path, filename)),
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                    log::debug!("artifact name {} taken, trying next suffix", filename);
                    temp = err.file;
                }
                Err(err) => return Err(ReportError::PersistArtifact(err.error)),
            }
        }

        Err(ReportError::NameExhausted(stem.to_string()))
    }
}

fn candidate_name(stem: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{}.{}", stem, XLSX_EXTENSION)
    } else {
        format!("{}_{}.{}", stem, attempt, XLSX_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name("order_1", 0), "order_1.xlsx");
        assert_eq!(candidate_name("order_1", 3), "order_1_3.xlsx");
    }

    #[test]
    fn test_persist_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();

        let (first, first_name) = XlsxRenderEngine::persist(b"one", dir.path(), "order_x").unwrap();
        let (second, second_name) =
            XlsxRenderEngine::persist(b"two", dir.path(), "order_x").unwrap();

        assert_eq!(first_name, "order_x.xlsx");
        assert_eq!(second_name, "order_x_1.xlsx");
        assert_eq!(fs::read(first).unwrap(), b"one");
        assert_eq!(fs::read(second).unwrap(), b"two");
    }

    #[test]
    fn test_persist_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        XlsxRenderEngine::persist(b"data", dir.path(), "order_y").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["order_y.xlsx".to_string()]);
    }
}
