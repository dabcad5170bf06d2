//! Sampling, aggregation and summary of PPFD over the working plane

pub mod grid;
pub mod irradiance;
pub mod rating;
pub mod stats;

pub use grid::{GridError, SampleGrid, MAX_GRID_POINTS};
pub use irradiance::{compute_field, FieldError, IrradianceField};
pub use rating::{RatingBands, UniformityRating};
pub use stats::{summarize, summarize_samples, FieldStatistics, UniformityMetrics};
