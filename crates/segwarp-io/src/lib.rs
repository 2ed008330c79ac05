//! File I/O, validation, and serialization for the segwarp pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ClassLabel, LabelledDataset};
pub use error::IoError;
pub use reader::{DatasetReader, StoredCentroid, read_centroids};
pub use writer::{CENTROIDS_FILE, PREDICTIONS_FILE, ResultWriter};
