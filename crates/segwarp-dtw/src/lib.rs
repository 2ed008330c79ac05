//! Alignment, resampling and normalisation for variable-length time series.
//!
//! Pure math library, zero I/O. Provides exact Dynamic Time Warping with
//! warping path extraction, the multi-resolution FastDTW approximation,
//! midpoint linear-interpolation resampling, and pooled z-score normalisation.
//!
//! DTW cost here is the accumulated squared difference along the optimal
//! path, with no final square root.

mod distance;
mod dtw;
mod error;
mod fastdtw;
mod normalize;
mod path;
mod resample;
mod series;
mod window;

pub use distance::DtwDistance;
pub use dtw::{Aligner, Dtw, alignment_distance, dtw};
pub use error::{DtwError, NormalizeError, ResampleError};
pub use fastdtw::{FastDtw, fastdtw};
pub use normalize::{NormalizationStats, denormalize, normalize};
pub use path::{WarpingPath, WarpingStep};
pub use resample::interpolate;
pub use series::{TimeSeries, TimeSeriesView};
pub use window::{FullWindow, ProjectedWindow, SearchWindow};
