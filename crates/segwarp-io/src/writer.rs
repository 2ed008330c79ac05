//! JSON result writer for centroid and classification outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use segwarp_evo::{ConvergencePoint, Logbook};
use segwarp_nc::ClassCentroid;

use crate::IoError;

/// File name of the centroid artifact.
pub const CENTROIDS_FILE: &str = "centroids.json";

/// File name of the prediction artifact.
pub const PREDICTIONS_FILE: &str = "predictions.json";

/// Writes centroid and prediction results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display()))]
    pub fn new(output_dir: &Path) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write class centroids to `centroids.json` and return its path.
    ///
    /// Each entry carries the label, centroid values, fitness, per-generation
    /// log and, when recorded, the convergence trace.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(n_classes = classes.len()))]
    pub fn write_centroids(&self, classes: &[ClassCentroid]) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(CENTROIDS_FILE);

        let entries: Vec<CentroidEntry<'_>> = classes
            .iter()
            .map(|c| CentroidEntry {
                label: &c.label,
                length: c.result.centroid.len(),
                fitness: c.result.fitness,
                centroid: &c.result.centroid,
                log: &c.result.logbook,
                trace: c.result.trace.as_deref(),
            })
            .collect();

        let artifact = CentroidArtifact {
            n_classes: classes.len(),
            inertia: classes.iter().map(|c| c.result.fitness).sum(),
            classes: entries,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "centroids written");
        Ok(path)
    }

    /// Write per-series predictions to `predictions.json` and return its path.
    ///
    /// `memberships`, when given, holds one row per series ordered as
    /// `class_labels`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(n_series = predicted.len()))]
    pub fn write_predictions(
        &self,
        class_labels: &[&str],
        predicted: &[&str],
        memberships: Option<&[Vec<f64>]>,
    ) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(PREDICTIONS_FILE);

        let entries: Vec<PredictionEntry<'_>> = predicted
            .iter()
            .enumerate()
            .map(|(index, &label)| PredictionEntry {
                index,
                predicted: label,
                memberships: memberships.and_then(|m| m.get(index)).map(Vec::as_slice),
            })
            .collect();

        let artifact = PredictArtifact {
            classes: class_labels,
            n_series: predicted.len(),
            predictions: entries,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "predictions written");
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct CentroidArtifact<'a> {
    n_classes: usize,
    inertia: f64,
    classes: Vec<CentroidEntry<'a>>,
}

#[derive(Serialize)]
struct CentroidEntry<'a> {
    label: &'a str,
    length: usize,
    fitness: f64,
    centroid: &'a [f64],
    log: &'a Logbook,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [ConvergencePoint]>,
}

#[derive(Serialize)]
struct PredictArtifact<'a> {
    classes: &'a [&'a str],
    n_series: usize,
    predictions: Vec<PredictionEntry<'a>>,
}

#[derive(Serialize)]
struct PredictionEntry<'a> {
    index: usize,
    predicted: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    memberships: Option<&'a [f64]>,
}
