//! Nearest-centroid classifier over evolved class centroids.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use segwarp_evo::{CentroidResult, GaConfig, compute_centroid};

use crate::assign::{fuzzy_predict_with, predict_with};
use crate::error::NcError;

/// The evolved centroid of one class.
#[derive(Debug, Clone)]
pub struct ClassCentroid {
    /// Class label.
    pub label: String,
    /// Centroid, fitness, generation log and optional trace for the class.
    pub result: CentroidResult,
}

/// Nearest-centroid classifier: one DTW centroid per class, computed by
/// evolutionary search with a shared [`GaConfig`].
#[derive(Debug, Clone)]
pub struct NearestCentroid {
    config: GaConfig,
    classes: Vec<ClassCentroid>,
    inertia: f64,
}

impl NearestCentroid {
    /// Create an unfitted classifier.
    #[must_use]
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            classes: Vec::new(),
            inertia: 0.0,
        }
    }

    /// Compute one centroid per distinct label, in ascending label order,
    /// replacing any previous fit.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NcError::EmptyTrainingSet`] | `series` is empty |
    /// | [`NcError::LabelCountMismatch`] | `labels.len() != series.len()` |
    /// | [`NcError::Evo`] | a centroid search fails |
    #[instrument(skip_all, fields(n_series = series.len()))]
    pub fn fit<S, L>(&mut self, series: &[S], labels: &[L]) -> Result<(), NcError>
    where
        S: AsRef<[f64]>,
        L: AsRef<str>,
    {
        if series.is_empty() {
            return Err(NcError::EmptyTrainingSet);
        }
        if labels.len() != series.len() {
            return Err(NcError::LabelCountMismatch {
                n_series: series.len(),
                n_labels: labels.len(),
            });
        }

        let mut groups: BTreeMap<&str, Vec<&[f64]>> = BTreeMap::new();
        for (s, label) in series.iter().zip(labels) {
            groups.entry(label.as_ref()).or_default().push(s.as_ref());
        }

        let mut classes = Vec::with_capacity(groups.len());
        let mut inertia = 0.0;
        for (label, members) in groups {
            let result = compute_centroid(&members, &self.config)?;
            info!(label, n_series = members.len(), fitness = result.fitness, "class centroid");
            inertia += result.fitness;
            classes.push(ClassCentroid {
                label: label.to_owned(),
                result,
            });
        }

        self.classes = classes;
        self.inertia = inertia;
        Ok(())
    }

    /// Fitted classes in ascending label order.
    #[must_use]
    pub fn classes(&self) -> &[ClassCentroid] {
        &self.classes
    }

    /// Labels of the fitted classes, in the order used by [`Self::fuzzy_predict`].
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.label.as_str()).collect()
    }

    /// Sum of the class centroids' fitness values.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Return true once [`Self::fit`] has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    fn centroids(&self) -> Vec<&[f64]> {
        self.classes.iter().map(|c| c.result.centroid.as_slice()).collect()
    }

    /// Label of the nearest class centroid for each series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NcError::NotFitted`] | called before a successful [`Self::fit`] |
    /// | [`NcError::Dtw`] | a series is empty or holds a non-finite value |
    pub fn predict<S: AsRef<[f64]>>(&self, series: &[S]) -> Result<Vec<&str>, NcError> {
        let indices = predict_with(&self.centroids(), series)?;
        Ok(indices.into_iter().map(|i| self.classes[i].label.as_str()).collect())
    }

    /// Membership of each series in every class, ordered as [`Self::labels`].
    ///
    /// # Errors
    ///
    /// As [`Self::predict`], plus [`NcError::ZeroTotalDistance`].
    pub fn fuzzy_predict<S: AsRef<[f64]>>(&self, series: &[S]) -> Result<Vec<Vec<f64>>, NcError> {
        fuzzy_predict_with(&self.centroids(), series)
    }

    /// Fraction of `series` whose predicted label equals `labels`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NcError::LabelCountMismatch`] | `labels.len() != series.len()` |
    /// | [`NcError::EmptyTestSet`] | `series` is empty |
    /// | prediction variants | see [`Self::predict`] |
    #[instrument(skip_all, fields(n_series = series.len()))]
    pub fn score<S, L>(&self, series: &[S], labels: &[L]) -> Result<f64, NcError>
    where
        S: AsRef<[f64]>,
        L: AsRef<str>,
    {
        if labels.len() != series.len() {
            return Err(NcError::LabelCountMismatch {
                n_series: series.len(),
                n_labels: labels.len(),
            });
        }
        if series.is_empty() {
            return Err(NcError::EmptyTestSet);
        }
        let predicted = self.predict(series)?;
        let correct = predicted
            .iter()
            .zip(labels)
            .filter(|&(&p, l)| p == AsRef::<str>::as_ref(l))
            .count();
        let accuracy = correct as f64 / series.len() as f64;
        info!(correct, total = series.len(), accuracy, "scored");
        Ok(accuracy)
    }
}
