pub mod config;
pub mod money;
pub mod receipt;
pub mod recognition;

pub use config::{ConfigError, RecognitionConfig, ScanConfig};
pub use money::Money;
pub use receipt::{ReceiptError, ReceiptRecord, ReceiptSeed};
pub use recognition::TextRecognitionResult;
