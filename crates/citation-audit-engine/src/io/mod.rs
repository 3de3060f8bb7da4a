pub mod docx;

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::models::DocumentModel;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Malformed XML in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing document part: {0}")]
    MissingPart(String),
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Read a document model, choosing the reader by file extension
pub fn read_document(path: &Path) -> Result<DocumentModel, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    log::info!("Reading {}", path.display());
    match extension.as_str() {
        "docx" => read_docx(path),
        "json" => read_json(path),
        _ => Err(DocumentError::UnsupportedFormat(extension)),
    }
}

/// Read the body, styles and footnotes of a Word document
pub fn read_docx(path: &Path) -> Result<DocumentModel, DocumentError> {
    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    docx::read_archive(&mut archive)
}

/// Read a document model serialized as JSON
pub fn read_json(path: &Path) -> Result<DocumentModel, DocumentError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a text artifact, creating parent directories as needed
pub fn write_text(path: &Path, content: &str) -> Result<(), DocumentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Output file path `<dir>/<input stem>.<suffix>`
pub fn artifact_path(out_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    out_dir.join(format!("{stem}.{suffix}"))
}
