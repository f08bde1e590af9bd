use image::DynamicImage;
use thiserror::Error;

use crate::types::{RecognitionOptions, RecognizedLine};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    Decode(String),
    #[error("OCR engine error: {0}")]
    Recognition(String),
    #[error("No text found")]
    NoTextFound,
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over a text-recognition engine.
/// Implementations receive a decoded image and return one observation per detected text line,
/// in whatever order the engine produces them.
pub trait TextRecognizer: Send + Sync {
    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedLine>, OcrError>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for std::sync::Arc<R> {
    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedLine>, OcrError> {
        (**self).recognize(image, options)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set list of observations — useful for unit testing the
/// pipeline without a recognition engine installed.
pub struct MockRecognizer {
    pub observations: Vec<RecognizedLine>,
}

impl MockRecognizer {
    pub fn new(observations: Vec<RecognizedLine>) -> Self {
        Self { observations }
    }

    /// Observations for `text`, one per line, with the first line at the top.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let n = lines.len().max(1) as f32;
        let observations = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| RecognizedLine::new(l, 1.0 - i as f32 / n))
            .collect();
        Self { observations }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(
        &self,
        _image: &DynamicImage,
        _options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedLine>, OcrError> {
        Ok(self.observations.clone())
    }
}

/// Stands in when no real backend is compiled in.
pub struct UnavailableRecognizer;

impl TextRecognizer for UnavailableRecognizer {
    fn recognize(
        &self,
        _image: &DynamicImage,
        _options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedLine>, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrError, TextRecognizer};
    use crate::types::{RecognitionOptions, RecognizedLine};
    use image::DynamicImage;
    use leptess::{capi, LepTess};
    use std::io::Cursor;
    use std::path::PathBuf;

    pub struct TesseractRecognizer {
        data_path: Option<PathBuf>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<PathBuf>) -> Self {
            Self { data_path }
        }
    }

    /// Map BCP-47 tags to Tesseract traineddata names, joined with `+`.
    pub(crate) fn tesseract_languages(languages: &[String]) -> String {
        let mut names: Vec<&str> = languages
            .iter()
            .map(|tag| match tag.split(['-', '_']).next().unwrap_or("") {
                "en" => "eng",
                "fr" => "fra",
                "de" => "deu",
                "es" => "spa",
                "it" => "ita",
                "pt" => "por",
                "nl" => "nld",
                _ => "eng",
            })
            .collect();
        names.dedup();
        if names.is_empty() {
            "eng".to_string()
        } else {
            names.join("+")
        }
    }

    impl TextRecognizer for TesseractRecognizer {
        fn recognize(
            &self,
            image: &DynamicImage,
            options: &RecognitionOptions,
        ) -> Result<Vec<RecognizedLine>, OcrError> {
            let data_path = self.data_path.as_ref().and_then(|p| p.to_str());
            let mut lt = LepTess::new(data_path, &tesseract_languages(&options.languages))
                .map_err(|e| OcrError::Recognition(e.to_string()))?;

            if !options.uses_language_correction {
                // Dictionary loading is fixed at init time in Tesseract.
                tracing::debug!("Language correction cannot be disabled for Tesseract");
            }

            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| OcrError::Decode(e.to_string()))?;
            lt.set_image_from_mem(&png)
                .map_err(|e| OcrError::Decode(e.to_string()))?;

            let height = image.height().max(1) as f32;
            let min_height_px = options.minimum_text_height * height;

            let Some(boxes) = lt.get_component_boxes(capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
            else {
                return Ok(Vec::new());
            };

            let mut lines = Vec::new();
            for b in &boxes {
                let g = b.get_geometry();
                if (g.h as f32) < min_height_px {
                    continue;
                }
                lt.set_rectangle(&b);
                let text = lt
                    .get_utf8_text()
                    .map_err(|e| OcrError::Recognition(e.to_string()))?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                // Tesseract boxes use a top-left origin; report the bottom edge from below.
                let bottom = (g.y + g.h) as f32;
                lines.push(RecognizedLine::new(text, 1.0 - bottom / height));
            }
            Ok(lines)
        }
    }

}
