//! Image to text conversion for receipt uploads.
//!
//! The server only needs `image bytes -> text`, expressed by [`Ocr`].
//! [`TesseractOcr`] pipes the image through the `tesseract` executable.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to start OCR command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

#[async_trait]
pub trait Ocr: Send + Sync {
    /// Read all text found in an encoded image.
    async fn recognize(&self, image: Bytes) -> Result<String, OcrError>;
}

/// Runs `<command> stdin stdout -l <language>`.
#[derive(Clone, Debug)]
pub struct TesseractOcr {
    command: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

#[async_trait]
impl Ocr for TesseractOcr {
    async fn recognize(&self, image: Bytes) -> Result<String, OcrError> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("OCR stdin not captured"))?;
        let write = async move {
            let result = stdin.write_all(&image).await;
            drop(stdin);
            result
        };

        // Feed stdin while draining stdout so neither pipe fills up.
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_command_is_a_spawn_error() {
        let ocr = TesseractOcr::new("expense-buddy-no-such-ocr", "eng");
        let err = ocr
            .recognize(Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));
        assert!(err.to_string().contains("expense-buddy-no-such-ocr"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_reports_exit_status() {
        let ocr = TesseractOcr::new("false", "eng");
        let err = ocr
            .recognize(Bytes::from_static(b"not an image"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Failed { .. }));
    }
}
