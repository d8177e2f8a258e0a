//! Classification verdict parsing and per-query JSON persistence

use crate::classify::sampler::SampledExamples;
use crate::io::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Binary lesion classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Malignant melanoma
    Melanoma,
    /// Benign lesion
    Benign,
}

impl Classification {
    /// Label text exactly as it appears in prompts and CSV rows
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Melanoma => "Melanoma",
            Self::Benign => "Benign",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model verdict as parsed from the reply text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Free-text reasoning from the model
    #[serde(default)]
    pub thoughts: String,
    /// The classification label
    pub answer: Classification,
}

/// Terminal record for one classified query image
///
/// Persisted as `<query stem>.json` in the save directory; the example paths
/// document which references the prompt was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Free-text reasoning from the model
    #[serde(default)]
    pub thoughts: String,
    /// The classification label
    pub answer: Classification,
    /// Benign reference images embedded in the prompt
    pub neg_examples: Vec<PathBuf>,
    /// Melanoma reference images embedded in the prompt
    pub pos_examples: Vec<PathBuf>,
}

impl ClassificationResult {
    /// Combine a parsed verdict with the sampled example provenance
    pub fn new(verdict: Verdict, examples: &SampledExamples) -> Self {
        Self {
            thoughts: verdict.thoughts,
            answer: verdict.answer,
            neg_examples: examples.negative.clone(),
            pos_examples: examples.positive.clone(),
        }
    }

    /// Write the result as pretty-printed JSON named after the query image
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialized
    pub fn save(&self, save_dir: &Path, query_image: &Path) -> Result<PathBuf> {
        let stem = query_image.file_stem().unwrap_or_default();
        let path = save_dir.join(format!("{}.json", stem.to_string_lossy()));

        let file = std::fs::File::create(&path)
            .map_err(|e| crate::io::error::file_system(&path, "create result file", e))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(path)
    }

    /// Read a previously saved result back from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a result
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::io::error::file_system(path, "read result file", e))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Parse a model reply into a verdict
///
/// The reply is expected to be a bare JSON object with an `answer` field.
/// Replies wrapped in markdown code fences or surrounding prose are
/// tolerated by extracting the outermost brace-delimited object.
///
/// # Errors
///
/// Returns an error if no JSON object can be extracted, the object lacks an
/// `answer` field, or the answer is neither "Melanoma" nor "Benign"
pub fn parse_verdict(text: &str) -> Result<Verdict> {
    let trimmed = text.trim().trim_matches('\u{feff}');

    if let Ok(verdict) = serde_json::from_str::<Verdict>(trimmed) {
        return Ok(verdict);
    }

    // Fallback for fenced or prose-wrapped replies
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Some(slice) = trimmed.get(start..=end) {
                return serde_json::from_str::<Verdict>(slice).map_err(|e| {
                    crate::io::error::malformed_response(format!(
                        "reply is not a classification object: {e}"
                    ))
                });
            }
        }
    }

    Err(crate::io::error::malformed_response(
        "reply contains no JSON object",
    ))
}
