//! Sequential few-shot classification over a query directory

use crate::classify::client::ChatClient;
use crate::classify::layout::ExperimentLayout;
use crate::classify::prompt::{Detail, FewShotPrompt, PromptTemplate};
use crate::classify::result::{Classification, ClassificationResult, parse_verdict};
use crate::classify::sampler::ExampleSampler;
use crate::io::configuration::CSV_HEADER;
use crate::io::error::Result;
use crate::io::image::list_image_files;
use crate::io::progress::ProgressManager;
use std::io::Write as _;
use std::path::PathBuf;

/// Settings for one classification run
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Number of reference examples drawn per label
    pub k: usize,
    /// Number of records accumulated before a CSV flush
    pub batch_size: usize,
    /// Image quality hint embedded in the prompt
    pub detail: Detail,
    /// Optional sampler seed for reproducible example draws
    pub seed: Option<u64>,
}

/// One row of the accumulating classification CSV
#[derive(Debug, Clone)]
pub struct BatchRecord {
    /// Query image file name
    pub image: String,
    /// Predicted label
    pub classification: Classification,
}

/// Accumulates classification records and appends them to a CSV in batches
///
/// The header is written once, only when the file did not exist when the
/// writer was created. Flushed records are gone from memory; a crash between
/// flushes loses at most one partial batch.
pub struct BatchWriter {
    path: PathBuf,
    needs_header: bool,
    pending: Vec<BatchRecord>,
    batch_size: usize,
}

impl BatchWriter {
    /// Create a writer appending to `path` with the given flush threshold
    pub fn new(path: PathBuf, batch_size: usize) -> Self {
        let needs_header = !path.exists();
        Self {
            path,
            needs_header,
            pending: Vec::new(),
            batch_size,
        }
    }

    /// Accumulate a record, flushing when the batch threshold is reached
    ///
    /// Returns whether a flush happened.
    ///
    /// # Errors
    ///
    /// Returns an error if a triggered flush fails to write
    pub fn push(&mut self, record: BatchRecord) -> Result<bool> {
        self.pending.push(record);
        if self.pending.len() >= self.batch_size.max(1) {
            self.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Flush any remaining records at the end of a run
    ///
    /// # Errors
    ///
    /// Returns an error if the final write fails
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.flush()
    }

    /// Number of records waiting for the next flush
    pub const fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn flush(&mut self) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| crate::io::error::file_system(&self.path, "open csv", e))?;

        let mut contents = String::new();
        if self.needs_header {
            contents.push_str(CSV_HEADER);
            contents.push('\n');
        }
        for record in &self.pending {
            contents.push_str(&csv_field(&record.image));
            contents.push(',');
            contents.push_str(record.classification.as_str());
            contents.push('\n');
        }

        file.write_all(contents.as_bytes())
            .map_err(|e| crate::io::error::file_system(&self.path, "append csv", e))?;

        self.needs_header = false;
        self.pending.clear();
        Ok(())
    }
}

// Quotes a field only when the value would break the row format.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Outcome counts for a completed classification run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Number of query images classified
    pub classified: usize,
    /// Total tokens consumed across all API calls
    pub total_tokens: u64,
}

/// Drives the sample, prompt, call, parse, persist loop for every query image
///
/// Processing is strictly sequential and fail-fast: the first error at any
/// stage aborts the run, leaving already-written JSON results and flushed
/// CSV batches on disk.
pub struct ClassificationRunner<C: ChatClient> {
    client: C,
    sampler: ExampleSampler,
    layout: ExperimentLayout,
    template: PromptTemplate,
    config: ClassifyConfig,
    show_progress: bool,
}

impl<C: ChatClient> ClassificationRunner<C> {
    /// Create a runner over a resolved layout and a chat backend
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is zero
    pub fn new(
        client: C,
        layout: ExperimentLayout,
        config: ClassifyConfig,
        show_progress: bool,
    ) -> Result<Self> {
        if config.k == 0 {
            return Err(crate::io::error::invalid_parameter(
                "k",
                &config.k,
                &"at least one reference example per label is required",
            ));
        }

        Ok(Self {
            client,
            sampler: ExampleSampler::new(config.seed),
            template: PromptTemplate::dermatology(config.k),
            layout,
            config,
            show_progress,
        })
    }

    /// Classify every query image in the layout's query directory
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed sample, prompt assembly, API
    /// call, reply parse, or persistence write
    pub fn run(&mut self) -> Result<RunSummary> {
        self.layout.ensure_save_dir()?;
        let query_images = list_image_files(&self.layout.query_dir)?;

        let progress = self
            .show_progress
            .then(|| ProgressManager::new("Queries", query_images.len()));
        let mut writer = BatchWriter::new(self.layout.csv_path.clone(), self.config.batch_size);
        let mut summary = RunSummary {
            classified: 0,
            total_tokens: 0,
        };

        for query_image in &query_images {
            let image_name = query_image
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if let Some(ref progress) = progress {
                progress.start_item(&format!("Classifying {image_name}"));
            }

            let examples = self.sampler.pick(
                &self.layout.negative_dir,
                &self.layout.positive_dir,
                query_image,
                self.config.k,
            )?;
            let prompt = FewShotPrompt::assemble(
                &self.template,
                &examples,
                query_image,
                self.config.detail,
            )?;

            let outcome = self.client.complete(&prompt)?;
            let verdict = parse_verdict(&outcome.text)?;

            let result = ClassificationResult::new(verdict, &examples);
            result.save(&self.layout.save_dir, query_image)?;

            summary.classified += 1;
            summary.total_tokens += outcome.total_tokens;

            if let Some(ref progress) = progress {
                progress.complete_item(Some(&format!(
                    "{image_name} -> {} ({} tokens)",
                    result.answer, outcome.total_tokens
                )));
            }

            let flushed = writer.push(BatchRecord {
                image: image_name,
                classification: result.answer,
            })?;
            if flushed && let Some(ref progress) = progress {
                progress.note(&format!("Batch saved to {}", self.layout.csv_path.display()));
            }
        }

        writer.finish()?;
        if let Some(ref progress) = progress {
            progress.finish(&format!(
                "Classified {} images, results in {}",
                summary.classified,
                self.layout.save_dir.display()
            ));
        }

        Ok(summary)
    }
}
