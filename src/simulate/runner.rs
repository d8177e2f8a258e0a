//! Batch conversion of image directories into simulated CVD variants

use crate::io::error::Result;
use crate::io::image::{list_image_files, load_rgb_array, save_rgb_array};
use crate::io::progress::ProgressManager;
use crate::simulate::simulator::{Deficiency, SimulatorKind, validate_severity};
use std::path::{Path, PathBuf};

/// Settings for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Simulation algorithm applied to every image
    pub simulator: SimulatorKind,
    /// Deficiency types to render, one output directory each
    pub deficiencies: Vec<Deficiency>,
    /// Deficiency severity in `0.0..=1.0`
    pub severity: f32,
    /// Source directories containing the original images
    pub sources: Vec<PathBuf>,
}

/// Outcome counts for a completed conversion run
#[derive(Debug, Clone, Copy)]
pub struct ConvertSummary {
    /// Number of images transformed and written
    pub converted: usize,
    /// Number of output directories populated
    pub directories: usize,
}

/// Output directory for one (source, deficiency) pair
///
/// The directory sits next to the source and concatenates the source name
/// with the simulator, deficiency, and severity tags, e.g.
/// `all_resized_brettel_protan_1`.
pub fn target_directory(
    source: &Path,
    simulator: SimulatorKind,
    deficiency: Deficiency,
    severity: f32,
) -> PathBuf {
    let stem = source.file_name().unwrap_or_default().to_string_lossy();
    let target_name = format!("{stem}_{simulator}_{deficiency}_{severity}");

    source.parent().map_or_else(
        || PathBuf::from(&target_name),
        |parent| parent.join(&target_name),
    )
}

/// Drives the (deficiency x source directory) conversion loop
pub struct ConvertRunner {
    config: ConvertConfig,
    progress: Option<ProgressManager>,
}

impl ConvertRunner {
    /// Create a runner for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the severity is out of range or no deficiency or
    /// source directory was supplied
    pub fn new(config: ConvertConfig, show_progress: bool) -> Result<Self> {
        validate_severity(config.severity)?;
        if config.deficiencies.is_empty() {
            return Err(crate::io::error::invalid_parameter(
                "deficiencies",
                &"[]",
                &"at least one deficiency type is required",
            ));
        }
        if config.sources.is_empty() {
            return Err(crate::io::error::invalid_parameter(
                "sources",
                &"[]",
                &"at least one source directory is required",
            ));
        }

        // Pre-list every source so the progress bar knows the total up front
        let mut total = 0;
        for source in &config.sources {
            total += list_image_files(source)?.len();
        }
        total *= config.deficiencies.len();

        let progress = show_progress.then(|| ProgressManager::new("Images", total));
        Ok(Self { config, progress })
    }

    /// Run the conversion, fail-fast on the first decode or encode error
    ///
    /// # Errors
    ///
    /// Returns an error if a source directory cannot be listed, an output
    /// directory cannot be created, or any image fails to decode, simulate,
    /// or encode
    pub fn run(&self) -> Result<ConvertSummary> {
        let mut summary = ConvertSummary {
            converted: 0,
            directories: 0,
        };

        for &deficiency in &self.config.deficiencies {
            for source in &self.config.sources {
                summary.converted += self.convert_directory(source, deficiency)?;
                summary.directories += 1;
            }
        }

        if let Some(ref progress) = self.progress {
            progress.finish(&format!(
                "Converted {} images into {} directories",
                summary.converted, summary.directories
            ));
        }

        Ok(summary)
    }

    fn convert_directory(&self, source: &Path, deficiency: Deficiency) -> Result<usize> {
        let target = target_directory(
            source,
            self.config.simulator,
            deficiency,
            self.config.severity,
        );
        // Idempotent: an existing directory and its contents are left alone
        std::fs::create_dir_all(&target)
            .map_err(|e| crate::io::error::file_system(&target, "create directory", e))?;

        let mut converted = 0;
        for image_path in list_image_files(source)? {
            let file_name = image_path.file_name().unwrap_or_default();
            if let Some(ref progress) = self.progress {
                progress.start_item(&format!(
                    "{} -> {deficiency}",
                    Path::new(file_name).display()
                ));
            }

            let pixels = load_rgb_array(&image_path)?;
            let simulated =
                self.config
                    .simulator
                    .simulate(&pixels, deficiency, self.config.severity)?;
            save_rgb_array(&simulated, target.join(file_name))?;

            converted += 1;
            if let Some(ref progress) = self.progress {
                progress.complete_item(None);
            }
        }

        Ok(converted)
    }
}
