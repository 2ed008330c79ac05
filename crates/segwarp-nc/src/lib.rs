//! Nearest-centroid classification of variable-length time series.
//!
//! One centroid per class is evolved with [`segwarp_evo::compute_centroid`];
//! new series take the label of the centroid at the lowest DTW cost, or a
//! fuzzy membership vector over all classes.

mod assign;
mod classifier;
mod error;

pub use assign::{fuzzy_predict_with, memberships, predict_with};
pub use classifier::{ClassCentroid, NearestCentroid};
pub use error::NcError;
