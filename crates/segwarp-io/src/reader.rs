//! CSV dataset reader and centroid file reader.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use segwarp_dtw::TimeSeries;

use crate::IoError;
use crate::domain::{ClassLabel, LabelledDataset};

/// Reads labelled time series from a CSV file.
///
/// Expected CSV format:
/// - Header row required; its contents are ignored
/// - `label,v0,v1,...,vn`: first column is the class label, the rest are values
/// - Rows may hold different numbers of values; trailing empty cells are ignored
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::MissingLabel`] | Empty label cell |
/// | [`IoError::EmptySeries`] | Row with a label and no values |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, unparseable, or an interior gap |
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    /// Create a new reader for the given CSV file path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    /// Read and validate the CSV file, returning a [`LabelledDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<LabelledDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header_cols = rdr.headers().map_err(|e| self.csv_error(e))?.len();
        debug!(header_cols, "read CSV header");

        let mut labels = Vec::new();
        let mut series = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let label = record.get(0).unwrap_or("");
            if label.is_empty() {
                return Err(IoError::MissingLabel {
                    path: self.path.clone(),
                    row_index,
                });
            }

            let cells: Vec<&str> = record.iter().skip(1).collect();
            let n_values = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |last| last + 1);
            if n_values == 0 {
                return Err(IoError::EmptySeries {
                    path: self.path.clone(),
                    row_index,
                    label: label.to_owned(),
                });
            }

            let mut values = Vec::with_capacity(n_values);
            for (col_index, raw) in cells[..n_values].iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: (*raw).to_owned(),
                    })?;
                values.push(value);
            }

            let ts = TimeSeries::new(values).map_err(|_| IoError::EmptySeries {
                path: self.path.clone(),
                row_index,
                label: label.to_owned(),
            })?;

            labels.push(ClassLabel::new(label.to_owned()));
            series.push(ts);
        }

        if series.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let dataset = LabelledDataset { labels, series };
        info!(
            n_series = dataset.len(),
            n_classes = dataset.classes().len(),
            min_len = dataset.series.iter().map(TimeSeries::len).min().unwrap_or(0),
            max_len = dataset.series.iter().map(TimeSeries::len).max().unwrap_or(0),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

/// A centroid loaded back from a `centroids.json` artifact.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredCentroid {
    /// Class label.
    pub label: String,
    /// Centroid values.
    pub centroid: Vec<f64>,
}

#[derive(Deserialize)]
struct CentroidFile {
    classes: Vec<StoredCentroid>,
}

/// Load the centroids of a `centroids.json` artifact, in file order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not a centroid artifact |
/// | [`IoError::NoCentroids`] | The artifact lists no classes |
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_centroids(path: &Path) -> Result<Vec<StoredCentroid>, IoError> {
    let content = std::fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: CentroidFile = serde_json::from_str(&content).map_err(|e| IoError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    if file.classes.is_empty() {
        return Err(IoError::NoCentroids {
            path: path.to_path_buf(),
        });
    }
    info!(n_centroids = file.classes.len(), "centroids loaded");
    Ok(file.classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_variable_length_rows() {
        let csv = "class,v0,v1,v2,v3\na,0.0,0.1,0.0,0.1\nb,5.0,5.1\na,1.0,2.0,3.0\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path()).read().unwrap();
        assert_eq!(ds.len(), 3);
        let lens: Vec<usize> = ds.series.iter().map(TimeSeries::len).collect();
        assert_eq!(lens, vec![4, 2, 3]);
        assert_eq!(ds.labels[1].as_str(), "b");
    }

    #[test]
    fn trailing_empty_cells_are_ignored() {
        let csv = "class,v0,v1,v2,v3\nx,1.0,2.0,,\ny, 3.0 ,4.0,5.0,6.0\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path()).read().unwrap();
        assert_eq!(ds.series[0].as_ref(), &[1.0, 2.0]);
        assert_eq!(ds.series[1].as_ref(), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn value_round_trip() {
        let csv = "class,v0,v1\nA,1.23456789,9.87654321\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path()).read().unwrap();
        let vals = ds.series[0].as_ref();
        assert!((vals[0] - 1.23456789).abs() < 1e-12);
        assert!((vals[1] - 9.87654321).abs() < 1e-12);
    }

    #[test]
    fn error_file_not_found() {
        let result = DatasetReader::new(Path::new("/nonexistent/file.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("class,v0,v1,v2\n");
        let result = DatasetReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_interior_gap() {
        let f = write_csv("class,v0,v1,v2\na,1.0,,3.0\n");
        let result = DatasetReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { col_index: 1, .. })));
    }

    #[test]
    fn error_non_finite_values() {
        for bad in ["NaN", "Inf", "abc"] {
            let f = write_csv(&format!("class,v0,v1\na,1.0,{bad}\n"));
            let result = DatasetReader::new(f.path()).read();
            assert!(matches!(result, Err(IoError::NonFiniteValue { .. })), "{bad}");
        }
    }

    #[test]
    fn error_missing_label_and_empty_row() {
        let f = write_csv("class,v0\n,1.0\n");
        let result = DatasetReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::MissingLabel { row_index: 0, .. })));

        let f = write_csv("class,v0,v1\na,1.0,2.0\nb,,\n");
        let result = DatasetReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptySeries { row_index: 1, .. })));
    }

    #[test]
    fn centroid_values_reload_bit_exact() {
        let values: Vec<f64> = vec![1.0229884228757373, 0.1 + 0.2, -7.000000000000001, 1e-300];
        let json = serde_json::json!({ "classes": [{ "label": "a", "centroid": values }] });
        let f = write_csv(&serde_json::to_string_pretty(&json).unwrap());
        let stored = read_centroids(f.path()).unwrap();
        let bits: Vec<u64> = stored[0].centroid.iter().map(|v| v.to_bits()).collect();
        let expected: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits, expected);
    }

    #[test]
    fn centroid_file_errors() {
        let f = write_csv("{\"classes\": []}");
        assert!(matches!(read_centroids(f.path()), Err(IoError::NoCentroids { .. })));
        let f = write_csv("not json");
        assert!(matches!(read_centroids(f.path()), Err(IoError::JsonParse { .. })));
    }
}
