use std::fmt;

/// Internal-consistency violations detected while computing weights.
///
/// None of these can arise from a single well-formed run; seeing one means
/// the stored index and length table disagree (e.g. two runs raced).
#[derive(Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A term with no postings, so its document frequency is zero.
    EmptyPostings { word: String },
    /// A document recorded with length zero still carries a non-zero count.
    ZeroLength { path: String, word: String, tf: f64 },
    /// IDF requested over an empty corpus.
    EmptyCorpus,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::EmptyPostings { word } => {
                write!(f, "term '{word}' has no postings (document frequency 0)")
            }
            IndexError::ZeroLength { path, word, tf } => write!(
                f,
                "document '{path}' has length 0 but term '{word}' counts {tf} occurrences"
            ),
            IndexError::EmptyCorpus => write!(f, "cannot compute idf over zero documents"),
        }
    }
}

impl std::error::Error for IndexError {}
