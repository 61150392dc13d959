#![forbid(unsafe_code)]

use std::cmp::Ordering;

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("position {index} out of range for series of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("subset range {start}..{end} out of range for series of length {len}")]
    SubsetOutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("filters have mismatched lengths ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("cannot average an empty integer series")]
    DivideByZero,
}

/// An ordered sequence of booleans, one entry per row of the series it was
/// derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthFilter(Vec<bool>);

impl TruthFilter {
    #[must_use]
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn count_true(&self) -> usize {
        self.0.iter().filter(|&&bit| bit).count()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn not(&self) -> Self {
        Self(self.0.iter().map(|bit| !bit).collect())
    }

    /// Elementwise AND. Combining assumes one entry per row of the same
    /// source, so mismatched lengths fail instead of truncating.
    pub fn and(&self, other: &Self) -> Result<Self, SeriesError> {
        self.combine(other, |a, b| a && b)
    }

    /// Elementwise OR. Same length requirement as [`TruthFilter::and`].
    pub fn or(&self, other: &Self) -> Result<Self, SeriesError> {
        self.combine(other, |a, b| a || b)
    }

    fn combine(&self, other: &Self, op: impl Fn(bool, bool) -> bool) -> Result<Self, SeriesError> {
        if self.0.len() != other.0.len() {
            return Err(SeriesError::LengthMismatch {
                left: self.0.len(),
                right: other.0.len(),
            });
        }
        Ok(Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        ))
    }
}

impl From<Vec<bool>> for TruthFilter {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl<const N: usize> From<[bool; N]> for TruthFilter {
    fn from(bits: [bool; N]) -> Self {
        Self(bits.to_vec())
    }
}

impl FromIterator<bool> for TruthFilter {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Element type of a series. Closed over the three supported column types.
pub trait SeriesValue: sealed::Sealed + Clone + PartialEq + std::fmt::Debug {
    /// Total ordering used by `sort`: lexicographic for strings, numeric
    /// ascending for integers, IEEE-754 total order for floats.
    fn total_order(&self, other: &Self) -> Ordering;
}

impl SeriesValue for String {
    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl SeriesValue for i64 {
    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl SeriesValue for f64 {
    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Marker for the numeric instantiations; string series never expose the
/// arithmetic surface.
pub trait NumericValue: SeriesValue + Copy + PartialOrd + Zero {}

impl NumericValue for i64 {}
impl NumericValue for f64 {}

/// An ordered, fixed-type vector with value semantics: every transform
/// returns a new series and never mutates the receiver, so a series and
/// anything derived from it share no storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<T: SeriesValue> {
    data: Vec<T>,
}

pub type StringSeries = Series<String>;
pub type IntSeries = Series<i64>;
pub type FloatSeries = Series<f64>;

impl<T: SeriesValue> Default for Series<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesValue> From<Vec<T>> for Series<T> {
    fn from(values: Vec<T>) -> Self {
        Self { data: values }
    }
}

impl<T: SeriesValue> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: SeriesValue> Series<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[must_use]
    pub fn from_values(values: Vec<T>) -> Self {
        Self { data: values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// The receiver's sequence followed by `values`, as a new series.
    #[must_use]
    pub fn append(&self, values: &[T]) -> Self {
        let mut changed = self.clone();
        changed.data.extend_from_slice(values);
        changed
    }

    /// Apply `op` to every element in order. Panics from `op` propagate.
    #[must_use]
    pub fn apply(&self, op: impl Fn(&T) -> T) -> Self {
        Self {
            data: self.data.iter().map(op).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Result<&T, SeriesError> {
        self.data.get(index).ok_or(SeriesError::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Self { data }
    }

    /// Elements in `[start, end)` as a new series.
    pub fn subset(&self, start: usize, end: usize) -> Result<Self, SeriesError> {
        if start > end || end > self.data.len() {
            return Err(SeriesError::SubsetOutOfRange {
                start,
                end,
                len: self.data.len(),
            });
        }
        Ok(Self {
            data: self.data[start..end].to_vec(),
        })
    }

    /// Keep exactly the elements whose position holds `true` in `mask`.
    /// Positions beyond either the mask or the series are skipped, not an
    /// error.
    #[must_use]
    pub fn pass_through(&self, mask: &TruthFilter) -> Self {
        let data = self
            .data
            .iter()
            .zip(mask.bits())
            .filter_map(|(value, pass)| pass.then(|| value.clone()))
            .collect();
        Self { data }
    }

    /// One boolean per element, length equal to the series; no
    /// short-circuiting.
    #[must_use]
    pub fn filter(&self, accept: impl Fn(&T) -> bool) -> TruthFilter {
        self.data.iter().map(accept).collect()
    }

    /// Position of the first element equal to `value`.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|entry| entry == value)
    }

    /// Ascending copy; stable, so equal elements keep their source order.
    #[must_use]
    pub fn sort(&self) -> Self {
        let mut sorted = self.clone();
        sorted.data.sort_by(SeriesValue::total_order);
        sorted
    }
}

impl<T: NumericValue> Series<T> {
    /// Arithmetic sum; zero for an empty series.
    #[must_use]
    pub fn sum(&self) -> T {
        self.data
            .iter()
            .copied()
            .fold(T::zero(), |total, value| total + value)
    }

    /// Position and value of the maximum, first occurrence on ties. An
    /// empty series has no maximum.
    #[must_use]
    pub fn max(&self) -> Option<(usize, T)> {
        let (&first, rest) = self.data.split_first()?;
        let mut position = 0;
        let mut best = first;
        for (offset, &value) in rest.iter().enumerate() {
            if value > best {
                best = value;
                position = offset + 1;
            }
        }
        Some((position, best))
    }

    /// Position and value of the minimum, first occurrence on ties.
    #[must_use]
    pub fn min(&self) -> Option<(usize, T)> {
        let (&first, rest) = self.data.split_first()?;
        let mut position = 0;
        let mut best = first;
        for (offset, &value) in rest.iter().enumerate() {
            if value < best {
                best = value;
                position = offset + 1;
            }
        }
        Some((position, best))
    }

    #[must_use]
    pub fn greater_than(&self, value: T) -> TruthFilter {
        self.filter(|entry| *entry > value)
    }

    #[must_use]
    pub fn smaller_than(&self, value: T) -> TruthFilter {
        self.filter(|entry| *entry < value)
    }
}

impl Series<f64> {
    /// Mean of the series. An empty series divides `0.0 / 0.0` and yields
    /// NaN per IEEE-754.
    #[must_use]
    pub fn avg(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }
}

impl Series<i64> {
    /// Mean of the series; an empty series has no defined integer mean.
    pub fn avg(&self) -> Result<f64, SeriesError> {
        if self.data.is_empty() {
            return Err(SeriesError::DivideByZero);
        }
        Ok(self.sum() as f64 / self.data.len() as f64)
    }
}

impl Series<String> {
    #[must_use]
    pub fn equal(&self, value: &str) -> TruthFilter {
        self.filter(|entry| entry.as_str() == value)
    }

    #[must_use]
    pub fn not_equal(&self, value: &str) -> TruthFilter {
        self.filter(|entry| entry.as_str() != value)
    }
}

#[cfg(test)]
mod tests {
    use super::{FloatSeries, IntSeries, SeriesError, StringSeries, TruthFilter};

    #[test]
    fn append_leaves_receiver_untouched() {
        let source = IntSeries::from_values(vec![1, 2]);
        let grown = source.append(&[3, 4]);

        assert_eq!(source.values(), &[1, 2]);
        assert_eq!(grown.values(), &[1, 2, 3, 4]);
    }

    #[test]
    fn apply_maps_in_order() {
        let series = IntSeries::from_values(vec![1, 2, 3]);
        let doubled = series.apply(|v| v * 2);

        assert_eq!(doubled.values(), &[2, 4, 6]);
        assert_eq!(series.values(), &[1, 2, 3]);
    }

    #[test]
    fn clone_shares_no_storage() {
        let source = StringSeries::from_values(vec!["a".to_owned()]);
        let cloned = source.clone();
        let grown = cloned.append(&["b".to_owned()]);

        assert_eq!(source.len(), 1);
        assert_eq!(cloned.len(), 1);
        assert_eq!(grown.len(), 2);
    }

    #[test]
    fn get_reports_out_of_range() {
        let series = IntSeries::from_values(vec![7]);
        assert_eq!(series.get(0).expect("in range"), &7);

        let err = series.get(1).expect_err("out of range");
        assert_eq!(err, SeriesError::OutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn concat_orders_receiver_first() {
        let left = FloatSeries::from_values(vec![1.0]);
        let right = FloatSeries::from_values(vec![2.0, 3.0]);
        assert_eq!(left.concat(&right).values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn subset_is_half_open() {
        let series = IntSeries::from_values(vec![10, 20, 30, 40]);
        assert_eq!(series.subset(1, 3).expect("valid").values(), &[20, 30]);
        assert!(series.subset(2, 2).expect("empty window").is_empty());
    }

    #[test]
    fn subset_rejects_invalid_bounds() {
        let series = IntSeries::from_values(vec![10, 20]);
        let err = series.subset(1, 3).expect_err("end past len");
        assert_eq!(
            err,
            SeriesError::SubsetOutOfRange {
                start: 1,
                end: 3,
                len: 2
            }
        );
        assert!(series.subset(2, 1).is_err());
    }

    #[test]
    fn pass_through_tolerates_short_mask() {
        let series = IntSeries::from_values(vec![1, 2, 3]);
        let mask = TruthFilter::from([true, false]);
        assert_eq!(series.pass_through(&mask).values(), &[1]);
    }

    #[test]
    fn pass_through_tolerates_long_mask() {
        let series = IntSeries::from_values(vec![1, 2]);
        let mask = TruthFilter::from([false, true, true, true]);
        assert_eq!(series.pass_through(&mask).values(), &[2]);
    }

    #[test]
    fn filter_emits_one_bit_per_element() {
        let series = IntSeries::from_values(vec![1, 5, 2, 8]);
        let mask = series.filter(|v| *v > 3);
        assert_eq!(mask, TruthFilter::from([false, true, false, true]));
    }

    #[test]
    fn find_returns_first_match() {
        let series = StringSeries::from_values(vec![
            "a".to_owned(),
            "b".to_owned(),
            "a".to_owned(),
        ]);
        assert_eq!(series.find(&"a".to_owned()), Some(0));
        assert_eq!(series.find(&"b".to_owned()), Some(1));
        assert_eq!(series.find(&"z".to_owned()), None);
    }

    #[test]
    fn sort_is_ascending_and_leaves_source() {
        let series = IntSeries::from_values(vec![3, 1, 2]);
        let sorted = series.sort();

        assert_eq!(sorted.values(), &[1, 2, 3]);
        assert_eq!(series.values(), &[3, 1, 2]);
    }

    #[test]
    fn sort_strings_lexicographically() {
        let series = StringSeries::from_values(vec![
            "pear".to_owned(),
            "apple".to_owned(),
            "fig".to_owned(),
        ]);
        assert_eq!(sorted_names(&series), vec!["apple", "fig", "pear"]);
    }

    fn sorted_names(series: &StringSeries) -> Vec<String> {
        series.sort().values().to_vec()
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(IntSeries::new().sum(), 0);
        assert_eq!(FloatSeries::new().sum(), 0.0);
    }

    #[test]
    fn max_handles_all_negative_values() {
        let series = IntSeries::from_values(vec![-5, -1, -9]);
        assert_eq!(series.max(), Some((1, -1)));
    }

    #[test]
    fn min_handles_all_positive_values() {
        let series = IntSeries::from_values(vec![5, 1, 9]);
        assert_eq!(series.min(), Some((1, 1)));
    }

    #[test]
    fn min_reports_first_occurrence() {
        let series = IntSeries::from_values(vec![-5, -1, -9, -9]);
        assert_eq!(series.min(), Some((2, -9)));
    }

    #[test]
    fn max_min_of_empty_is_none() {
        assert_eq!(IntSeries::new().max(), None);
        assert_eq!(FloatSeries::new().min(), None);
    }

    #[test]
    fn int_avg_of_empty_fails() {
        let err = IntSeries::new().avg().expect_err("empty mean");
        assert_eq!(err, SeriesError::DivideByZero);
    }

    #[test]
    fn int_avg_divides_as_float() {
        let series = IntSeries::from_values(vec![1, 2]);
        assert!((series.avg().expect("mean") - 1.5).abs() < 1e-12);
    }

    #[test]
    fn float_avg_of_empty_is_nan() {
        assert!(FloatSeries::new().avg().is_nan());
    }

    #[test]
    fn comparison_masks_cover_every_element() {
        let series = FloatSeries::from_values(vec![1.0, 2.5, 4.0]);
        assert_eq!(
            series.greater_than(2.0),
            TruthFilter::from([false, true, true])
        );
        assert_eq!(
            series.smaller_than(2.0),
            TruthFilter::from([true, false, false])
        );
    }

    #[test]
    fn string_equality_masks() {
        let series = StringSeries::from_values(vec![
            "one".to_owned(),
            "two".to_owned(),
            "one".to_owned(),
        ]);
        assert_eq!(series.equal("one"), TruthFilter::from([true, false, true]));
        assert_eq!(
            series.not_equal("one"),
            TruthFilter::from([false, true, false])
        );
    }

    // ── TruthFilter ────────────────────────────────────────────────────

    #[test]
    fn not_negates_elementwise() {
        let filter = TruthFilter::from([true, false, true]);
        assert_eq!(filter.not(), TruthFilter::from([false, true, false]));
    }

    #[test]
    fn and_or_combine_equal_lengths() {
        let left = TruthFilter::from([true, true, false]);
        let right = TruthFilter::from([true, false, false]);

        assert_eq!(
            left.and(&right).expect("and"),
            TruthFilter::from([true, false, false])
        );
        assert_eq!(
            left.or(&right).expect("or"),
            TruthFilter::from([true, true, false])
        );
    }

    #[test]
    fn combining_mismatched_lengths_fails() {
        let left = TruthFilter::from([true, false]);
        let right = TruthFilter::from([true]);

        let err = left.and(&right).expect_err("mismatch");
        assert_eq!(err, SeriesError::LengthMismatch { left: 2, right: 1 });
        assert!(left.or(&right).is_err());
    }

    #[test]
    fn count_true_counts_set_bits() {
        let filter = TruthFilter::from([true, false, true, true]);
        assert_eq!(filter.count_true(), 3);
        assert_eq!(filter.len(), 4);
    }
}
