//! SummaryScan - single-pass extrema, mean and spread over floating point data
//!
//! Grew out of a plain min/max scanner: the same NaN bookkeeping, plus a
//! Welford accumulator so mean and population standard deviation come out of
//! the same pass over the data.

use num_traits::float::Float;
use std::fmt;
use thiserror::Error;

/// Error types for SummaryScan operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummaryError {
    #[error("NaN value encountered at index {0}")]
    NaNEncountered(usize),
    #[error("No data provided (empty slice)")]
    NoData,
}

/// Extrema and moments of a slice, computed once at construction
#[derive(Debug, Clone)]
pub struct SummaryScan<T: Float> {
    count: usize,
    min_value: Option<T>,
    max_value: Option<T>,
    mean: T,
    // Sum of squared deviations from the running mean (Welford's M2)
    m2: T,
    nan_index: Option<usize>,
}

impl<T: Float + fmt::Debug> SummaryScan<T> {
    /// Scan a slice of values.
    ///
    /// NaN values are skipped for the accumulators, but the first NaN index is
    /// remembered and every accessor reports it as an error.
    ///
    /// # Example
    /// ```
    /// use shared::algo::summary_scan::SummaryScan;
    ///
    /// let scan = SummaryScan::<f64>::new(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    /// assert_eq!(scan.min_max().unwrap(), (2.0, 9.0));
    /// assert!((scan.mean().unwrap() - 5.0).abs() < 1e-12);
    /// assert!((scan.std_dev().unwrap() - 2.0).abs() < 1e-12);
    /// ```
    pub fn new(data: &[T]) -> Self {
        let mut scan = Self {
            count: 0,
            min_value: None,
            max_value: None,
            mean: T::zero(),
            m2: T::zero(),
            nan_index: None,
        };

        for (index, &value) in data.iter().enumerate() {
            if value.is_nan() {
                scan.nan_index.get_or_insert(index);
                continue;
            }

            scan.min_value = Some(scan.min_value.map_or(value, |m| m.min(value)));
            scan.max_value = Some(scan.max_value.map_or(value, |m| m.max(value)));

            scan.count += 1;
            let n = T::from(scan.count).unwrap_or_else(T::one);
            let delta = value - scan.mean;
            scan.mean = scan.mean + delta / n;
            scan.m2 = scan.m2 + delta * (value - scan.mean);
        }

        scan
    }

    fn check(&self) -> Result<(), SummaryError> {
        match (self.nan_index, self.count) {
            (Some(index), _) => Err(SummaryError::NaNEncountered(index)),
            (None, 0) => Err(SummaryError::NoData),
            _ => Ok(()),
        }
    }

    /// Number of non-NaN values scanned
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min(&self) -> Result<T, SummaryError> {
        self.check()?;
        self.min_value.ok_or(SummaryError::NoData)
    }

    pub fn max(&self) -> Result<T, SummaryError> {
        self.check()?;
        self.max_value.ok_or(SummaryError::NoData)
    }

    pub fn min_max(&self) -> Result<(T, T), SummaryError> {
        Ok((self.min()?, self.max()?))
    }

    /// Arithmetic mean
    pub fn mean(&self) -> Result<T, SummaryError> {
        self.check()?;
        Ok(self.mean)
    }

    /// Population standard deviation (divides by N, not N - 1)
    pub fn std_dev(&self) -> Result<T, SummaryError> {
        self.check()?;
        let n = T::from(self.count).ok_or(SummaryError::NoData)?;
        Ok((self.m2 / n).max(T::zero()).sqrt())
    }

    pub fn has_nan(&self) -> bool {
        self.nan_index.is_some()
    }
}
