use std::sync::Arc;

use crate::normalize::{join_transcript, normalize};
use crate::recognizer::{OcrError, TextRecognizer};
use crate::types::{OrderedTranscript, RecognitionOptions};

/// Entry point from raw image bytes to an ordered transcript.
///
/// Holds the engine settings forwarded on every call; the per-call minimum
/// text height replaces the configured one.
pub struct RecognitionService<R: TextRecognizer> {
    recognizer: Arc<R>,
    options: RecognitionOptions,
}

impl<R: TextRecognizer> Clone for RecognitionService<R> {
    fn clone(&self) -> Self {
        Self { recognizer: Arc::clone(&self.recognizer), options: self.options.clone() }
    }
}

impl<R: TextRecognizer + 'static> RecognitionService<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_options(recognizer, RecognitionOptions::default())
    }

    pub fn with_options(recognizer: R, options: RecognitionOptions) -> Self {
        Self { recognizer: Arc::new(recognizer), options }
    }

    pub fn options(&self) -> &RecognitionOptions {
        &self.options
    }

    /// Recognize `image` and return its lines top-to-bottom.
    pub fn recognize_lines(
        &self,
        image: &[u8],
        minimum_text_height: f32,
    ) -> Result<OrderedTranscript, OcrError> {
        let decoded = image::load_from_memory(image).map_err(|e| OcrError::Decode(e.to_string()))?;
        let options = self.options.clone().with_minimum_text_height(minimum_text_height);

        let observations = self.recognizer.recognize(&decoded, &options)?;
        tracing::debug!(
            observations = observations.len(),
            width = decoded.width(),
            height = decoded.height(),
            "Text recognition finished"
        );
        if observations.is_empty() {
            return Err(OcrError::NoTextFound);
        }
        Ok(normalize(observations))
    }

    /// Recognize `image` and return the transcript joined by `\n`.
    pub fn recognize_text(&self, image: &[u8], minimum_text_height: f32) -> Result<String, OcrError> {
        self.recognize_lines(image, minimum_text_height)
            .map(|lines| join_transcript(&lines))
    }

    /// [`recognize_lines`](Self::recognize_lines) on the blocking thread pool.
    pub async fn recognize_lines_async(
        &self,
        image: Vec<u8>,
        minimum_text_height: f32,
    ) -> Result<OrderedTranscript, OcrError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.recognize_lines(&image, minimum_text_height))
            .await
            .map_err(|e| OcrError::Recognition(format!("recognition task failed: {e}")))?
    }

    /// [`recognize_text`](Self::recognize_text) on the blocking thread pool.
    pub async fn recognize_text_async(
        &self,
        image: Vec<u8>,
        minimum_text_height: f32,
    ) -> Result<String, OcrError> {
        self.recognize_lines_async(image, minimum_text_height)
            .await
            .map(|lines| join_transcript(&lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;
    use crate::types::RecognizedLine;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(
            &self,
            _image: &DynamicImage,
            _options: &RecognitionOptions,
        ) -> Result<Vec<RecognizedLine>, OcrError> {
            Err(OcrError::Recognition("engine crashed".into()))
        }
    }

    #[derive(Default)]
    struct RecordingRecognizer {
        seen: Mutex<Option<RecognitionOptions>>,
    }

    impl TextRecognizer for RecordingRecognizer {
        fn recognize(
            &self,
            _image: &DynamicImage,
            options: &RecognitionOptions,
        ) -> Result<Vec<RecognizedLine>, OcrError> {
            *self.seen.lock().unwrap() = Some(options.clone());
            Ok(vec![RecognizedLine::new("x", 0.5)])
        }
    }

    #[test]
    fn joins_lines_top_to_bottom() {
        let service = RecognitionService::new(MockRecognizer::new(vec![
            RecognizedLine::new("Total $5.50", 0.2),
            RecognizedLine::new("STARBUCKS", 0.9),
            RecognizedLine::new("Latte", 0.5),
        ]));
        let text = service.recognize_text(&tiny_png(), 0.0).unwrap();
        assert_eq!(text, "STARBUCKS\nLatte\nTotal $5.50");
    }

    #[test]
    fn undecodable_image_is_decode_error() {
        let service = RecognitionService::new(MockRecognizer::from_text("ignored"));
        let err = service.recognize_text(b"not an image", 0.0).unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn engine_error_propagates() {
        let service = RecognitionService::new(FailingRecognizer);
        let err = service.recognize_text(&tiny_png(), 0.0).unwrap_err();
        assert!(matches!(err, OcrError::Recognition(msg) if msg == "engine crashed"));
    }

    #[test]
    fn zero_observations_is_no_text_found() {
        let service = RecognitionService::new(MockRecognizer::new(Vec::new()));
        let err = service.recognize_text(&tiny_png(), 0.0).unwrap_err();
        assert!(matches!(err, OcrError::NoTextFound));
    }

    #[test]
    fn minimum_height_is_forwarded_unchanged() {
        let service = RecognitionService::new(RecordingRecognizer::default());
        service.recognize_text(&tiny_png(), 0.1).unwrap();
        let seen = service.recognizer.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.minimum_text_height, 0.1);
        assert_eq!(seen.languages, vec!["en-US"]);
        assert!(seen.uses_language_correction);

        // Out-of-range values are passed through as well.
        service.recognize_text(&tiny_png(), 2.0).unwrap();
        let seen = service.recognizer.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.minimum_text_height, 2.0);
    }

    #[test]
    fn configured_options_are_forwarded() {
        let options = RecognitionOptions {
            languages: vec!["fr-FR".into()],
            uses_language_correction: false,
            minimum_text_height: 0.3,
        };
        let service = RecognitionService::with_options(RecordingRecognizer::default(), options);
        service.recognize_text(&tiny_png(), 0.0).unwrap();
        let seen = service.recognizer.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.languages, vec!["fr-FR"]);
        assert!(!seen.uses_language_correction);
        assert_eq!(seen.minimum_text_height, 0.0);
    }

    #[tokio::test]
    async fn async_variant_matches_sync() {
        let service = RecognitionService::new(MockRecognizer::from_text("A\nB"));
        let sync = service.recognize_text(&tiny_png(), 0.0).unwrap();
        let async_text = service.recognize_text_async(tiny_png(), 0.0).await.unwrap();
        assert_eq!(sync, async_text);
    }

    #[tokio::test]
    async fn async_lines_keep_blank_and_cr_lines() {
        let service = RecognitionService::new(MockRecognizer::new(vec![
            RecognizedLine::new("", 0.1),
            RecognizedLine::new("Shop\r", 0.9),
        ]));
        let lines = service.recognize_lines_async(tiny_png(), 0.0).await.unwrap();
        assert_eq!(lines, vec!["Shop\r", ""]);
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let a = RecognitionService::new(MockRecognizer::from_text("first"));
        let b = RecognitionService::new(MockRecognizer::from_text("second"));
        let (ra, rb) = tokio::join!(
            a.recognize_text_async(tiny_png(), 0.0),
            b.recognize_text_async(tiny_png(), 0.0)
        );
        assert_eq!(ra.unwrap(), "first");
        assert_eq!(rb.unwrap(), "second");
    }
}
