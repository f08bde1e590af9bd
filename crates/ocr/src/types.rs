use serde::{Deserialize, Serialize};
use slipscan_core::RecognitionConfig;

/// One detected text region as reported by a recognition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
    /// Position of the region in the image, 0.0 = bottom edge, 1.0 = top edge.
    pub vertical_position: f32,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, vertical_position: f32) -> Self {
        Self { text: text.into(), vertical_position }
    }
}

/// Lines of one image, topmost first.
pub type OrderedTranscript = Vec<String>;

/// Per-call settings handed to a [`TextRecognizer`](crate::recognizer::TextRecognizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionOptions {
    pub languages: Vec<String>,
    pub uses_language_correction: bool,
    /// Fraction of image height; smaller text is ignored by the engine.
    pub minimum_text_height: f32,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        RecognitionConfig::default().into()
    }
}

impl From<RecognitionConfig> for RecognitionOptions {
    fn from(config: RecognitionConfig) -> Self {
        Self {
            languages: config.languages,
            uses_language_correction: config.uses_language_correction,
            minimum_text_height: config.minimum_text_height,
        }
    }
}

impl RecognitionOptions {
    pub fn with_minimum_text_height(mut self, minimum_text_height: f32) -> Self {
        self.minimum_text_height = minimum_text_height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_english_with_correction() {
        let o = RecognitionOptions::default();
        assert_eq!(o.languages, vec!["en-US"]);
        assert!(o.uses_language_correction);
        assert_eq!(o.minimum_text_height, 0.0);
    }

    #[test]
    fn minimum_height_is_not_clamped() {
        let o = RecognitionOptions::default().with_minimum_text_height(1.5);
        assert_eq!(o.minimum_text_height, 1.5);
    }
}
