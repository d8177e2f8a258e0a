//! Random selection of labeled reference images for few-shot prompts

use crate::io::error::{PipelineError, Result};
use crate::io::image::list_image_files;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::index};
use std::path::{Path, PathBuf};

/// Reference images drawn for a single query
#[derive(Debug, Clone)]
pub struct SampledExamples {
    /// Paths of the chosen benign reference images
    pub negative: Vec<PathBuf>,
    /// Paths of the chosen melanoma reference images
    pub positive: Vec<PathBuf>,
}

/// Uniform without-replacement sampler over label directories
///
/// The query image is never eligible as its own reference: any file in a
/// label directory sharing the query's file name is excluded before drawing.
pub struct ExampleSampler {
    rng: StdRng,
}

impl ExampleSampler {
    /// Create a sampler, seeded for reproducibility when a seed is given
    ///
    /// Without a seed the generator is initialized from OS entropy and draws
    /// differ between runs.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { rng }
    }

    /// Draw `k` negative and `k` positive reference images for a query
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be listed or holds fewer
    /// than `k` eligible images
    pub fn pick(
        &mut self,
        negative_dir: &Path,
        positive_dir: &Path,
        query_image: &Path,
        k: usize,
    ) -> Result<SampledExamples> {
        let negative = self.pick_from(negative_dir, query_image, k)?;
        let positive = self.pick_from(positive_dir, query_image, k)?;
        Ok(SampledExamples { negative, positive })
    }

    fn pick_from(&mut self, dir: &Path, query_image: &Path, k: usize) -> Result<Vec<PathBuf>> {
        let query_name = query_image.file_name().unwrap_or_default();
        let eligible: Vec<PathBuf> = list_image_files(dir)?
            .into_iter()
            .filter(|path| path.file_name().unwrap_or_default() != query_name)
            .collect();

        if eligible.len() < k {
            return Err(PipelineError::InsufficientExamples {
                directory: dir.to_path_buf(),
                requested: k,
                available: eligible.len(),
            });
        }

        let chosen = index::sample(&mut self.rng, eligible.len(), k)
            .into_iter()
            .filter_map(|i| eligible.get(i).cloned())
            .collect();
        Ok(chosen)
    }
}
