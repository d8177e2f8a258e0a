//! Pipeline constants and runtime configuration defaults

/// Image file extensions eligible for conversion and classification
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Chat completion defaults mirror the published experiment settings
/// Default chat model identifier
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Default maximum response token budget
pub const DEFAULT_MAX_TOKENS: u32 = 300;
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default request timeout in seconds for a single blocking call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default chat completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Environment variable consulted for the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// Few-shot experiment defaults
/// Default number of reference examples drawn per label
pub const DEFAULT_EXAMPLE_COUNT: usize = 2;
/// Default number of classifications accumulated before a CSV flush
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default repetition identifier for result directories
pub const DEFAULT_REPETITION: u32 = 1;

// Simulation defaults
/// Default deficiency severity (full dichromacy)
pub const DEFAULT_SEVERITY: f32 = 1.0;

// Experiment directory conventions
/// Query set directory stem for the full image set
pub const QUERY_DIR_STEM: &str = "all_resized";
/// Query set directory stem for the held-out test set
pub const TEST_DIR_STEM: &str = "test_resized";
/// Negative (benign) label directory stem
pub const NEGATIVE_DIR_STEM: &str = "bn_resized_label";
/// Positive (melanoma) label directory stem
pub const POSITIVE_DIR_STEM: &str = "mm_resized_label";
/// Default root for experiment input data
pub const DEFAULT_DATA_ROOT: &str = "./data";
/// Default root for classification results
pub const DEFAULT_OUTPUT_ROOT: &str = "./result";

// CSV persistence settings
/// Header row written once to a fresh classification CSV
pub const CSV_HEADER: &str = "Image,Classification";
