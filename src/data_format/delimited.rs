//! Delimited-text input and output.
//!
//! Input files hold one sample per line with features separated by a single
//! delimiter character and no header row. The feature count is fixed by the
//! first row. Output files hold one label per line, or one centroid per line.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::data_format::dataset::{Dataset, DenseDataset};
use crate::error::{KMeansError, Result};
use crate::types::{ClusterIndex, FeatureValue};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Parse a delimited table from a reader.
///
/// Blank lines are skipped. Every row must have the same number of fields as
/// the first one, and every field must parse as a number that is finite in `T`.
pub fn read_dataset<T: FeatureValue, R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<DenseDataset<T>> {
    let mut values: Vec<T> = Vec::new();
    let mut dimensionality = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_idx + 1;

        let start = values.len();
        for (col_idx, token) in line.split(delimiter).enumerate() {
            let token = token.trim();
            let value = token
                .parse::<f64>()
                .ok()
                .map(T::from_f64)
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    KMeansError::invalid_data(format!(
                        "line {}, column {}: cannot parse '{}' as a finite number",
                        line_no,
                        col_idx + 1,
                        token
                    ))
                })?;
            values.try_reserve(1)?;
            values.push(value);
        }
        let fields = values.len() - start;

        if dimensionality == 0 {
            dimensionality = fields;
        } else if fields != dimensionality {
            return Err(KMeansError::invalid_data(format!(
                "line {}: expected {} fields, found {}",
                line_no, dimensionality, fields
            )));
        }
    }

    if values.is_empty() {
        return Err(KMeansError::invalid_data("input contains no samples"));
    }

    DenseDataset::from_flat(values, dimensionality)
}

/// Load a delimited table from a file.
pub fn load_dataset<T: FeatureValue>(
    path: impl AsRef<Path>,
    delimiter: char,
) -> Result<DenseDataset<T>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| KMeansError::io(path.display(), e))?;
    read_dataset(BufReader::new(file), delimiter).map_err(|e| {
        if e.code().is_io() {
            KMeansError::new(e.code(), format!("{}: {}", path.display(), e.message()))
        } else {
            e
        }
    })
}

/// Write one label per line, in sample order.
pub fn write_labels<W: Write>(mut writer: W, labels: &[ClusterIndex]) -> Result<()> {
    for label in labels {
        writeln!(writer, "{}", label)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one centroid per line: its first `dims` coordinates with six decimals.
pub fn write_centroids<T: FeatureValue, W: Write>(
    mut writer: W,
    centroids: &DenseDataset<T>,
    dims: usize,
    delimiter: char,
) -> Result<()> {
    if dims == 0 || dims > centroids.dimensionality() {
        return Err(KMeansError::invalid_argument(format!(
            "cannot write {} coordinates of {}-dimensional centroids",
            dims,
            centroids.dimensionality()
        )));
    }

    let mut line = String::new();
    for row in centroids.rows() {
        line.clear();
        for (j, value) in row[..dims].iter().enumerate() {
            if j > 0 {
                line.push(delimiter);
            }
            line.push_str(&format!("{:.6}", value.as_f64()));
        }
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the labels into it.
pub fn save_labels(path: impl AsRef<Path>, labels: &[ClusterIndex]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| KMeansError::io(path.display(), e))?;
    write_labels(BufWriter::new(file), labels).map_err(|e| with_path(path, e))
}

/// Create (or truncate) `path` and write the centroids into it.
pub fn save_centroids<T: FeatureValue>(
    path: impl AsRef<Path>,
    centroids: &DenseDataset<T>,
    dims: usize,
    delimiter: char,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| KMeansError::io(path.display(), e))?;
    write_centroids(BufWriter::new(file), centroids, dims, delimiter)
        .map_err(|e| with_path(path, e))
}

fn with_path(path: &Path, err: KMeansError) -> KMeansError {
    KMeansError::new(err.code(), format!("{}: {}", path.display(), err.message()))
}

/// The label and centroid files of one run, both opened before either is written.
///
/// If the second file cannot be created the first is removed again, and
/// [`ResultFiles::discard`] removes both after a failed write, so a failed
/// run leaves no result file behind.
#[derive(Debug)]
pub struct ResultFiles {
    labels_path: PathBuf,
    centers_path: PathBuf,
    labels: BufWriter<File>,
    centers: BufWriter<File>,
}

impl ResultFiles {
    /// Create (or truncate) both output files.
    pub fn create(labels_path: impl AsRef<Path>, centers_path: impl AsRef<Path>) -> Result<Self> {
        let labels_path = labels_path.as_ref().to_path_buf();
        let centers_path = centers_path.as_ref().to_path_buf();

        let labels =
            File::create(&labels_path).map_err(|e| KMeansError::io(labels_path.display(), e))?;
        let centers = match File::create(&centers_path) {
            Ok(file) => file,
            Err(e) => {
                drop(labels);
                let _ = fs::remove_file(&labels_path);
                return Err(KMeansError::io(centers_path.display(), e));
            }
        };

        Ok(Self {
            labels_path,
            centers_path,
            labels: BufWriter::new(labels),
            centers: BufWriter::new(centers),
        })
    }

    /// Write one label per line into the label file.
    pub fn write_labels(&mut self, labels: &[ClusterIndex]) -> Result<()> {
        write_labels(&mut self.labels, labels).map_err(|e| with_path(&self.labels_path, e))
    }

    /// Write the first `dims` coordinates of each centroid into the centroid file.
    pub fn write_centroids<T: FeatureValue>(
        &mut self,
        centroids: &DenseDataset<T>,
        dims: usize,
        delimiter: char,
    ) -> Result<()> {
        write_centroids(&mut self.centers, centroids, dims, delimiter)
            .map_err(|e| with_path(&self.centers_path, e))
    }

    /// Close and delete both files.
    pub fn discard(self) {
        let Self {
            labels_path,
            centers_path,
            labels,
            centers,
        } = self;
        drop(labels);
        drop(centers);
        let _ = fs::remove_file(labels_path);
        let _ = fs::remove_file(centers_path);
    }
}
