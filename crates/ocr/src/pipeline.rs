use std::path::Path;
use thiserror::Error;

use slipscan_core::{ReceiptRecord, ReceiptSeed, TextRecognitionResult};

use crate::assemble::assemble_receipt;
use crate::hash;
use crate::normalize::join_transcript;
use crate::recognizer::{OcrError, TextRecognizer};
use crate::service::RecognitionService;
use crate::types::OrderedTranscript;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Everything produced by scanning one receipt image.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub recognition: TextRecognitionResult,
    pub receipt: ReceiptRecord,
}

/// Orchestrates: decode → recognize → order lines → assemble.
pub struct ScanPipeline<R: TextRecognizer> {
    service: RecognitionService<R>,
    minimum_text_height: f32,
}

impl<R: TextRecognizer + 'static> ScanPipeline<R> {
    pub fn new(service: RecognitionService<R>) -> Self {
        let minimum_text_height = service.options().minimum_text_height;
        Self { service, minimum_text_height }
    }

    pub fn with_minimum_text_height(mut self, minimum_text_height: f32) -> Self {
        self.minimum_text_height = minimum_text_height;
        self
    }

    /// Recognize text only, without building a receipt.
    pub async fn recognize_bytes(
        &self,
        data: &[u8],
        source_ref: Option<&str>,
    ) -> Result<TextRecognitionResult, PipelineError> {
        let (_, recognition) = self.recognize(data, source_ref).await?;
        Ok(recognition)
    }

    /// Recognize and assemble a receipt from raw bytes (camera capture or file read).
    pub async fn scan_bytes(
        &self,
        data: &[u8],
        source_ref: Option<&str>,
        seed: Option<&ReceiptSeed>,
    ) -> Result<ScanOutcome, PipelineError> {
        let (lines, recognition) = self.recognize(data, source_ref).await?;
        let receipt = assemble_receipt(&lines, seed);
        if !receipt.is_save_worthy() {
            tracing::debug!("Receipt from {} needs manual completion", recognition.source_image_ref);
        }
        Ok(ScanOutcome { recognition, receipt })
    }

    /// Process a file on disk; the file name becomes the source reference.
    pub async fn scan_file(
        &self,
        path: &Path,
        seed: Option<&ReceiptSeed>,
    ) -> Result<ScanOutcome, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path.file_name().and_then(|n| n.to_str());
        self.scan_bytes(&bytes, name, seed).await
    }

    /// The ordered lines and the recognition result joined from those same lines.
    async fn recognize(
        &self,
        data: &[u8],
        source_ref: Option<&str>,
    ) -> Result<(OrderedTranscript, TextRecognitionResult), PipelineError> {
        let source = source_ref.map_or_else(|| hash::image_ref(data), str::to_string);
        let lines = self
            .service
            .recognize_lines_async(data.to_vec(), self.minimum_text_height)
            .await?;
        tracing::info!("Recognized {} lines from {source}", lines.len());
        let recognition = TextRecognitionResult::new(join_transcript(&lines), source);
        Ok((lines, recognition))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;
    use crate::types::RecognizedLine;
    use chrono::NaiveDate;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use slipscan_core::Money;
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn pipeline(text: &str) -> ScanPipeline<MockRecognizer> {
        ScanPipeline::new(RecognitionService::new(MockRecognizer::from_text(text)))
    }

    #[tokio::test]
    async fn scan_bytes_produces_both_outputs() {
        let p = pipeline("Joe's Cafe\n123 Main St\n24/11/24\nTotal $15.50\nGST $1.50");
        let out = p.scan_bytes(&tiny_png(), Some("cafe.png"), None).await.unwrap();

        assert_eq!(out.recognition.source_image_ref, "cafe.png");
        assert_eq!(out.recognition.text, out.receipt.raw_text);
        assert_eq!(out.receipt.business_name, "Joe's Cafe");
        assert_eq!(out.receipt.total_amount, Money::from_cents(1550));
        assert_eq!(out.receipt.gst_amount, Some(Money::from_cents(150)));
        assert_eq!(
            out.receipt.transaction_date,
            NaiveDate::from_ymd_opt(2024, 11, 24).unwrap()
        );
    }

    #[tokio::test]
    async fn raw_text_matches_recognition_with_blank_and_cr_lines() {
        let p = ScanPipeline::new(RecognitionService::new(MockRecognizer::new(vec![
            RecognizedLine::new("Shop\r", 0.9),
            RecognizedLine::new("Total $1.00", 0.5),
            RecognizedLine::new("", 0.1),
        ])));
        let out = p.scan_bytes(&tiny_png(), None, None).await.unwrap();

        assert_eq!(out.recognition.text, "Shop\r\nTotal $1.00\n");
        assert_eq!(out.receipt.raw_text, out.recognition.text);
        assert_eq!(out.receipt.business_name, "Shop\r");
        assert_eq!(out.receipt.total_amount, Money::from_cents(100));
    }

    #[tokio::test]
    async fn unnamed_image_is_content_addressed() {
        let p = pipeline("STORE");
        let data = tiny_png();
        let r1 = p.recognize_bytes(&data, None).await.unwrap();
        let r2 = p.recognize_bytes(&data, None).await.unwrap();
        assert_eq!(r1.source_image_ref.len(), 64);
        assert_eq!(r1.source_image_ref, r2.source_image_ref);
        assert_eq!(r1.source_image_ref, hash::image_ref(&data));
    }

    #[tokio::test]
    async fn seed_is_applied() {
        let p = pipeline("Scanned Name\nTotal $3.00");
        let seed = ReceiptSeed { business_name: Some("Typed Name".into()), ..Default::default() };
        let out = p.scan_bytes(&tiny_png(), None, Some(&seed)).await.unwrap();
        assert_eq!(out.receipt.business_name, "Typed Name");
        assert_eq!(out.receipt.total_amount, Money::from_cents(300));
    }

    #[tokio::test]
    async fn no_text_is_an_error() {
        let p = pipeline("");
        let err = p.scan_bytes(&tiny_png(), None, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(OcrError::NoTextFound)));
    }

    #[tokio::test]
    async fn scan_file_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt-01.png");
        std::fs::write(&path, tiny_png()).unwrap();

        let out = pipeline("SHOP\nTotal $1.00").scan_file(&path, None).await.unwrap();
        assert_eq!(out.recognition.source_image_ref, "receipt-01.png");
        assert!(out.receipt.is_save_worthy());
    }

    #[tokio::test]
    async fn scan_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline("x")
            .scan_file(&dir.path().join("absent.png"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
