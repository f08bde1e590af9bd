pub mod assemble;
pub mod extract;
pub mod hash;
pub mod normalize;
pub mod pipeline;
pub mod recognizer;
pub mod service;
pub mod types;

pub use assemble::{assemble_receipt, assemble_receipt_at};
pub use extract::{extract_amount, extract_date, extract_phone};
pub use hash::{image_ref, sha256_bytes, to_hex};
pub use normalize::{join_transcript, normalize};
pub use pipeline::{PipelineError, ScanOutcome, ScanPipeline};
pub use recognizer::{MockRecognizer, OcrError, TextRecognizer, UnavailableRecognizer};
pub use service::RecognitionService;
pub use types::{OrderedTranscript, RecognitionOptions, RecognizedLine};
