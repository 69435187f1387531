//! Client-side upload validation and submission status
//!
//! Two mutually exclusive submission kinds: a PDF file (multipart, with
//! progress) or a website URL (JSON). Unsupported file types are rejected
//! here, before any network call. Exactly one terminal status is shown at a
//! time and auto-dismisses after a fixed delay; nothing retries
//! automatically.

use crate::{DocChatError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Only PDF files are supported";

/// Check a candidate file by extension or declared MIME type.
pub fn is_supported_file(name: &str, mime: Option<&str>) -> bool {
    let by_name = name.to_lowercase().ends_with(".pdf");
    let by_mime = mime
        .map(|m| m.eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    by_name || by_mime
}

pub fn validate_file(name: &str, mime: Option<&str>) -> Result<()> {
    if is_supported_file(name, mime) {
        Ok(())
    } else {
        Err(DocChatError::ValidationError(
            UNSUPPORTED_TYPE_MESSAGE.to_string(),
        ))
    }
}

/// A file the user picked or dropped, pending submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    /// Validate and stat a dropped/picked path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DocChatError::ValidationError("Invalid file name".into()))?
            .to_string();
        validate_file(&name, None)?;

        let size = std::fs::metadata(path)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size,
        })
    }
}

/// Submission status shown in the upload panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    /// Request body being sent; percent complete
    Uploading(u8),
    /// Body fully sent, server-side processing and indexing in progress
    Indexing,
    Success,
    /// `Some` carries a server-supplied message, `None` is the generic error
    Failed(Option<String>),
    Timeout,
}

impl UploadStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, UploadStatus::Uploading(_) | UploadStatus::Indexing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Success | UploadStatus::Failed(_) | UploadStatus::Timeout
        )
    }

    /// Terminal statuses clear themselves after a fixed delay.
    pub fn dismiss_after(&self) -> Option<Duration> {
        match self {
            UploadStatus::Success => Some(Duration::from_secs(5)),
            UploadStatus::Failed(_) | UploadStatus::Timeout => Some(Duration::from_secs(10)),
            _ => None,
        }
    }
}

/// Human-readable file size for the selected-file card.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = (bytes as f64).log(1024.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_rejected_pdf_accepted() {
        assert!(!is_supported_file("report.docx", None));
        assert!(is_supported_file("report.pdf", None));
        assert!(is_supported_file("REPORT.PDF", None));
    }

    #[test]
    fn test_mime_type_alone_is_sufficient() {
        assert!(is_supported_file("scan", Some("application/pdf")));
        assert!(is_supported_file("scan", Some("Application/PDF")));
        assert!(!is_supported_file("scan", Some("text/plain")));
    }

    #[test]
    fn test_validation_error_carries_user_message() {
        let err = validate_file("report.docx", None).unwrap_err();
        assert_eq!(err.user_message(), UNSUPPORTED_TYPE_MESSAGE);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_selected_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let selected = SelectedFile::from_path(&path).unwrap();
        assert_eq!(selected.name, "report.pdf");
        assert_eq!(selected.size, 8);

        let bad = dir.path().join("report.docx");
        std::fs::write(&bad, b"x").unwrap();
        assert!(SelectedFile::from_path(&bad).is_err());
    }

    #[test]
    fn test_terminal_statuses_dismiss() {
        assert_eq!(
            UploadStatus::Success.dismiss_after(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            UploadStatus::Failed(None).dismiss_after(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            UploadStatus::Timeout.dismiss_after(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(UploadStatus::Uploading(40).dismiss_after(), None);
        assert!(!UploadStatus::Idle.is_terminal());
        assert!(UploadStatus::Indexing.is_in_progress());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
    }
}
