//! Domain types for segwarp-io.

use std::collections::BTreeSet;

use segwarp_dtw::TimeSeries;

/// A class label read from the first column of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a label from a non-empty string.
    pub(crate) fn new(label: String) -> Self {
        debug_assert!(!label.is_empty(), "class label must not be empty");
        Self(label)
    }

    /// Return the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Labelled time series of possibly different lengths.
///
/// Produced by [`DatasetReader`](crate::DatasetReader). Labels and series are
/// stored in parallel vectors: `labels[i]` is the class of `series[i]`.
#[derive(Debug)]
pub struct LabelledDataset {
    /// Class labels in row order.
    pub labels: Vec<ClassLabel>,
    /// Validated series in the same order as `labels`.
    pub series: Vec<TimeSeries>,
}

impl LabelledDataset {
    /// Return the number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Return true if the dataset holds no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Distinct labels in ascending order.
    #[must_use]
    pub fn classes(&self) -> Vec<&ClassLabel> {
        self.labels.iter().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Series whose label equals `label`, in row order.
    #[must_use]
    pub fn series_of(&self, label: &str) -> Vec<&TimeSeries> {
        self.labels
            .iter()
            .zip(&self.series)
            .filter(|(l, _)| l.as_str() == label)
            .map(|(_, s)| s)
            .collect()
    }
}
