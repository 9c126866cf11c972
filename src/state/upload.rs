//! Sequential PDF upload queue.
//!
//! Files are sent one at a time, in selection order. The first failure
//! stops the batch: progress freezes at the number already uploaded and the
//! remaining files are not attempted. Files already uploaded stay uploaded.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::handle::StateHandle;
use crate::api::ApiClient;
use crate::error::{classify_io_error, AppError, AppResult, StateError, ValidationError};
use crate::models::PdfDocument;
use crate::view_state::Progress;

/// One file picked for upload.
#[derive(Debug, Clone)]
pub enum UploadFile {
    /// Read from disk right before it is sent
    Path(PathBuf),
    Memory { file_name: String, data: Bytes },
}

impl UploadFile {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        UploadFile::Path(path.into())
    }

    pub fn memory(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        UploadFile::Memory {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            UploadFile::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            UploadFile::Memory { file_name, .. } => file_name.clone(),
        }
    }

    async fn read(&self) -> AppResult<Bytes> {
        match self {
            UploadFile::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| classify_io_error(e, Some(path.clone()), "read PDF").into()),
            UploadFile::Memory { data, .. } => Ok(data.clone()),
        }
    }
}

fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Progress of the current (or last) batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub in_progress: bool,
    /// Files uploaded so far out of the batch size
    pub progress: Progress,
    pub current_file: Option<String>,
    pub failed_file: Option<String>,
    pub error: Option<String>,
}

/// Result of one batch.
#[derive(Debug)]
pub struct UploadReport {
    pub uploaded: Vec<PdfDocument>,
    pub total: usize,
    /// Zero-based index and error of the file that stopped the batch
    pub failure: Option<(usize, AppError)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct UploadQueue {
    api: ApiClient,
    subject_id: String,
    state: StateHandle<UploadState>,
}

impl UploadQueue {
    pub fn new(api: ApiClient, subject_id: impl Into<String>) -> Self {
        Self {
            api,
            subject_id: subject_id.into(),
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<UploadState> {
        &self.state
    }

    pub fn snapshot(&self) -> UploadState {
        self.state.snapshot()
    }

    /// Upload `files` in order.
    ///
    /// Rejected up front (no request sent) when the batch is empty, holds a
    /// non-PDF name, or another batch is running. Per-file failures are
    /// reported in the returned [`UploadReport`], not as `Err`.
    pub async fn run(&self, files: Vec<UploadFile>) -> AppResult<UploadReport> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles.into());
        }
        if let Some(bad) = files.iter().map(UploadFile::file_name).find(|n| !is_pdf_name(n)) {
            return Err(ValidationError::NotPdf { file_name: bad }.into());
        }

        let total = files.len();
        let started = self
            .state
            .update(|s| {
                if s.in_progress {
                    return false;
                }
                *s = UploadState {
                    in_progress: true,
                    progress: Progress::new(0, total as u32),
                    ..UploadState::default()
                };
                true
            })
            .ok_or(StateError::Disposed)?;
        if !started {
            return Err(StateError::UploadInProgress.into());
        }

        info!("Uploading {} PDF(s) to subject {}", total, self.subject_id);
        let mut uploaded = Vec::with_capacity(total);

        for (index, file) in files.iter().enumerate() {
            let name = file.file_name();
            self.state.update(|s| s.current_file = Some(name.clone()));
            debug!("Uploading {} ({}/{})", name, index + 1, total);

            let result = match file.read().await {
                Ok(data) => self.api.upload_pdf(&self.subject_id, &name, data).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(pdf) => {
                    uploaded.push(pdf);
                    let done = uploaded.len() as u32;
                    self.state.update(|s| s.progress = Progress::new(done, total as u32));
                }
                Err(err) => {
                    warn!("Upload of {} failed: {} ({})", name, err, err.error_code());
                    let message = err.user_message();
                    self.state.update(|s| {
                        s.in_progress = false;
                        s.current_file = None;
                        s.failed_file = Some(name.clone());
                        s.error = Some(message);
                    });
                    return Ok(UploadReport {
                        uploaded,
                        total,
                        failure: Some((index, err)),
                    });
                }
            }
        }

        self.state.update(|s| {
            s.in_progress = false;
            s.current_file = None;
        });
        info!("Uploaded {} PDF(s)", total);
        Ok(UploadReport {
            uploaded,
            total,
            failure: None,
        })
    }

    pub fn dismiss_error(&self) {
        self.state.update(|s| {
            s.error = None;
            s.failed_file = None;
        });
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
