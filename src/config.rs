//! Run configuration for parkmeans.
//!
//! A [`RunConfig`] describes one complete clustering job: where samples come
//! from, where the two result files go, and how the clustering core is set up.
//! The defaults reproduce the classic `data.csv` job.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::data_format::DEFAULT_DELIMITER;
use crate::distance_measures::ActiveDimensions;
use crate::error::{KMeansError, Result};
use crate::kmeans::KMeansConfig;

/// Default input file.
pub const DEFAULT_INPUT: &str = "data.csv";

/// Default label output file.
pub const DEFAULT_LABELS_OUTPUT: &str = "cluster_assignments.csv";

/// Default centroid output file.
pub const DEFAULT_CENTERS_OUTPUT: &str = "cluster_centers.csv";

/// Number of leading features the default job clusters on.
pub const DEFAULT_ACTIVE_DIMENSIONS: usize = 2;

/// Main configuration for a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Delimited sample file.
    pub input: PathBuf,

    /// File receiving one label per sample.
    pub labels_output: PathBuf,

    /// File receiving one centroid per line.
    pub centers_output: PathBuf,

    /// Field separator for the input and the centroid file.
    pub delimiter: char,

    /// Clustering settings. Fields missing from a JSON `kmeans` object keep
    /// the run defaults, including two active dimensions.
    #[serde(deserialize_with = "deserialize_run_kmeans")]
    pub kmeans: KMeansConfig,
}

/// Clustering fields given explicitly in a run configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KMeansOverrides {
    num_clusters: Option<usize>,
    max_iterations: Option<usize>,
    num_threads: Option<usize>,
    seed: Option<u64>,
    active_dimensions: Option<ActiveDimensions>,
}

impl KMeansOverrides {
    fn apply(self, mut config: KMeansConfig) -> KMeansConfig {
        if let Some(k) = self.num_clusters {
            config.num_clusters = k;
        }
        if let Some(iterations) = self.max_iterations {
            config.max_iterations = iterations;
        }
        if let Some(threads) = self.num_threads {
            config.num_threads = Some(threads);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dims) = self.active_dimensions {
            config.active_dimensions = dims;
        }
        config
    }
}

fn default_run_kmeans() -> KMeansConfig {
    KMeansConfig::default()
        .with_active_dimensions(ActiveDimensions::Leading(DEFAULT_ACTIVE_DIMENSIONS))
}

fn deserialize_run_kmeans<'de, D>(deserializer: D) -> std::result::Result<KMeansConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = KMeansOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(default_run_kmeans()))
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            labels_output: PathBuf::from(DEFAULT_LABELS_OUTPUT),
            centers_output: PathBuf::from(DEFAULT_CENTERS_OUTPUT),
            delimiter: DEFAULT_DELIMITER,
            kmeans: default_run_kmeans(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| KMeansError::io(path.display(), e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            KMeansError::invalid_data(format!("{}: invalid configuration: {}", path.display(), e))
        })
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| KMeansError::invalid_data(format!("invalid configuration: {e}")))
    }

    /// Set the input file.
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Set both output files.
    pub fn with_outputs(
        mut self,
        labels: impl Into<PathBuf>,
        centers: impl Into<PathBuf>,
    ) -> Self {
        self.labels_output = labels.into();
        self.centers_output = centers.into();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the clustering settings.
    pub fn with_kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_whitespace() || self.delimiter == '.' || self.delimiter == '-' {
            return Err(KMeansError::invalid_argument(format!(
                "{:?} cannot be used as a field delimiter",
                self.delimiter
            )));
        }
        self.kmeans.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.labels_output, PathBuf::from("cluster_assignments.csv"));
        assert_eq!(config.centers_output, PathBuf::from("cluster_centers.csv"));
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.kmeans.num_clusters, 10);
        assert_eq!(config.kmeans.max_iterations, 100);
        assert_eq!(config.kmeans.active_dimensions, ActiveDimensions::Leading(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new()
            .with_input("points.tsv")
            .with_outputs("labels.txt", "centers.txt")
            .with_delimiter('\t')
            .with_kmeans(KMeansConfig::new(3));
        assert_eq!(config.input, PathBuf::from("points.tsv"));
        assert_eq!(config.labels_output, PathBuf::from("labels.txt"));
        assert_eq!(config.centers_output, PathBuf::from("centers.txt"));
        assert_eq!(config.kmeans.num_clusters, 3);
    }

    #[test]
    fn test_validate_rejects_bad_delimiter() {
        assert!(RunConfig::new().with_delimiter(' ').validate().is_err());
        assert!(RunConfig::new().with_delimiter('.').validate().is_err());
        assert!(RunConfig::new().with_delimiter(';').validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = RunConfig::from_json_str(
            r#"{"input": "blobs.csv", "kmeans": {"num_clusters": 4, "active_dimensions": "all"}}"#,
        )
        .unwrap();
        assert_eq!(config.input, PathBuf::from("blobs.csv"));
        assert_eq!(config.labels_output, PathBuf::from(DEFAULT_LABELS_OUTPUT));
        assert_eq!(config.kmeans.num_clusters, 4);
        assert_eq!(config.kmeans.max_iterations, 100);
        assert_eq!(config.kmeans.active_dimensions, ActiveDimensions::All);
    }

    #[test]
    fn test_partial_kmeans_json_keeps_run_defaults() {
        let config = RunConfig::from_json_str(r#"{"kmeans": {"seed": 7}}"#).unwrap();
        assert_eq!(config.kmeans.seed, Some(7));
        assert_eq!(config.kmeans, RunConfig::default().kmeans.with_seed(7));
        assert_eq!(config.kmeans.active_dimensions, ActiveDimensions::Leading(2));

        let config = RunConfig::from_json_str(r#"{"kmeans": {}}"#).unwrap();
        assert_eq!(config, RunConfig::default());

        let config =
            RunConfig::from_json_str(r#"{"kmeans": {"num_threads": 3, "max_iterations": 5}}"#)
                .unwrap();
        assert_eq!(config.kmeans.num_threads, Some(3));
        assert_eq!(config.kmeans.max_iterations, 5);
        assert_eq!(config.kmeans.num_clusters, 10);
        assert_eq!(config.kmeans.active_dimensions, ActiveDimensions::Leading(2));
    }

    #[test]
    fn test_config_serialization() {
        let config = RunConfig::new().with_delimiter(';');
        let json = serde_json::to_string(&config).unwrap();
        let deserialized = RunConfig::from_json_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delimiter": ";", "kmeans": {{"seed": 7}}}}"#).unwrap();
        let config = RunConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.kmeans.seed, Some(7));
        assert_eq!(config.kmeans.active_dimensions, ActiveDimensions::Leading(2));

        let err = RunConfig::from_json_file("/nonexistent/parkmeans.json").unwrap_err();
        assert!(err.code().is_io());

        assert!(RunConfig::from_json_str("{not json").is_err());
    }
}
