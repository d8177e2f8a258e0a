//! Experiment directory conventions for classification runs

use crate::io::configuration::{
    NEGATIVE_DIR_STEM, POSITIVE_DIR_STEM, QUERY_DIR_STEM, TEST_DIR_STEM,
};
use crate::io::error::Result;
use crate::simulate::simulator::{Deficiency, SimulatorKind};
use std::path::{Path, PathBuf};

/// Which image preprocessing variant a run classifies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageVariant {
    /// Untransformed source images
    Original,
    /// Images converted by a CVD simulator
    Simulated {
        /// Simulation algorithm the images were converted with
        simulator: SimulatorKind,
        /// Simulated deficiency type
        deficiency: Deficiency,
        /// Simulation severity
        severity: f32,
    },
}

impl ImageVariant {
    /// Directory suffix selecting this variant, empty for original images
    pub fn dir_suffix(&self) -> String {
        match self {
            Self::Original => String::new(),
            Self::Simulated {
                simulator,
                deficiency,
                severity,
            } => format!("_{simulator}_{deficiency}_{severity}"),
        }
    }

    /// Tag naming this variant inside a task name
    pub fn tag(&self) -> String {
        match self {
            Self::Original => "original".to_string(),
            Self::Simulated {
                simulator,
                deficiency,
                severity,
            } => format!("{simulator}_{deficiency}_{severity}"),
        }
    }
}

/// Resolved input and output paths for one classification run
#[derive(Debug, Clone)]
pub struct ExperimentLayout {
    /// Task name, e.g. `2_shot_brettel_protan_1`
    pub task: String,
    /// Directory holding the query images
    pub query_dir: PathBuf,
    /// Directory holding benign-labeled reference images
    pub negative_dir: PathBuf,
    /// Directory holding melanoma-labeled reference images
    pub positive_dir: PathBuf,
    /// Directory receiving per-query JSON results and the CSV
    pub save_dir: PathBuf,
    /// Path of the accumulating classification CSV
    pub csv_path: PathBuf,
}

impl ExperimentLayout {
    /// Resolve all paths from the experiment parameters
    ///
    /// `test_set` switches the query directory to the held-out test split
    /// and marks the task name accordingly.
    pub fn new(
        data_root: &Path,
        output_root: &Path,
        variant: &ImageVariant,
        k: usize,
        repetition: u32,
        test_set: bool,
    ) -> Self {
        let suffix = variant.dir_suffix();
        let query_stem = if test_set { TEST_DIR_STEM } else { QUERY_DIR_STEM };
        let test_tag = if test_set { "_test" } else { "" };
        let task = format!("{k}_shot_{}{test_tag}", variant.tag());

        let save_dir = output_root.join(&task).join(format!("rep{repetition}"));
        let csv_path = save_dir.join(format!("{task}.csv"));

        Self {
            task,
            query_dir: data_root.join(format!("{query_stem}{suffix}")),
            negative_dir: data_root.join(format!("{NEGATIVE_DIR_STEM}{suffix}")),
            positive_dir: data_root.join(format!("{POSITIVE_DIR_STEM}{suffix}")),
            save_dir,
            csv_path,
        }
    }

    /// Create the save directory, succeeding if it already exists
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn ensure_save_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.save_dir)
            .map_err(|e| crate::io::error::file_system(&self.save_dir, "create directory", e))
    }
}
