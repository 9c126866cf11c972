//! `/api/subjects/{id}/pdfs` and the flat `/api/pdf` endpoints.

use bytes::Bytes;

use super::client::{decode_item, decode_list, seg, ApiClient};
use crate::error::AppResult;
use crate::models::{DownloadUrlResponse, PdfDocument};
use crate::traits::MultipartUpload;

impl ApiClient {
    pub async fn list_pdfs(&self, subject_id: &str) -> AppResult<Vec<PdfDocument>> {
        let response = self
            .get_raw(&format!("/api/subjects/{}/pdfs", seg(subject_id)))
            .await?;
        decode_list(&response, &["pdfs"])
    }

    /// Upload one PDF as multipart/form-data (field `file`).
    pub async fn upload_pdf(
        &self,
        subject_id: &str,
        file_name: &str,
        data: Bytes,
    ) -> AppResult<PdfDocument> {
        let upload = MultipartUpload::pdf(file_name, data);
        let response = self
            .post_multipart(&format!("/api/subjects/{}/pdfs", seg(subject_id)), &upload)
            .await?;
        decode_item(&response, "pdf")
    }

    pub async fn get_pdf(&self, subject_id: &str, pdf_id: &str) -> AppResult<PdfDocument> {
        let response = self
            .get_raw(&format!(
                "/api/subjects/{}/pdfs/{}",
                seg(subject_id),
                seg(pdf_id)
            ))
            .await?;
        decode_item(&response, "pdf")
    }

    pub async fn delete_pdf(&self, subject_id: &str, pdf_id: &str) -> AppResult<()> {
        self.delete(&format!(
            "/api/subjects/{}/pdfs/{}",
            seg(subject_id),
            seg(pdf_id)
        ))
        .await
    }

    /// Short-lived signed URL for downloading the original file.
    pub async fn pdf_download_url(
        &self,
        subject_id: &str,
        pdf_id: &str,
    ) -> AppResult<DownloadUrlResponse> {
        self.get_json(&format!(
            "/api/subjects/{}/pdfs/{}/download-url",
            seg(subject_id),
            seg(pdf_id)
        ))
        .await
    }

    /// Every PDF of the user across subjects.
    pub async fn list_all_pdfs(&self) -> AppResult<Vec<PdfDocument>> {
        let response = self.get_raw("/api/pdf/list").await?;
        decode_list(&response, &["pdfs"])
    }

    pub async fn delete_pdf_by_id(&self, pdf_id: &str) -> AppResult<()> {
        self.delete(&format!("/api/pdf/{}", seg(pdf_id))).await
    }
}
