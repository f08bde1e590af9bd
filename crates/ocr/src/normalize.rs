use crate::types::{OrderedTranscript, RecognizedLine};

/// Order observations top-to-bottom.
///
/// The sort is stable: lines reported at the same height keep their detection
/// order. Nothing is dropped or merged.
pub fn normalize(mut observations: Vec<RecognizedLine>) -> OrderedTranscript {
    observations.sort_by(|a, b| b.vertical_position.total_cmp(&a.vertical_position));
    observations.into_iter().map(|o| o.text).collect()
}

pub fn join_transcript(lines: &[String]) -> String {
    lines.join("\n")
}
