//! Axis whose tick marks are chosen up front instead of by plotters

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use std::ops::Range;

/// Wraps a linear coordinate and reports `ticks` as its key points.
///
/// Keeps plotters' default formatting so the mesh label formatters apply.
pub struct FixedTicks<R: Ranged> {
    inner: R,
    ticks: Vec<R::ValueType>,
}

impl<R: Ranged> FixedTicks<R> {
    pub fn new(inner: R, ticks: Vec<R::ValueType>) -> Self {
        Self { inner, ticks }
    }

    pub fn ticks(&self) -> &[R::ValueType] {
        &self.ticks
    }
}

impl<R> Ranged for FixedTicks<R>
where
    R: Ranged,
    R::ValueType: Clone,
{
    type FormatOption = DefaultFormatting;
    type ValueType = R::ValueType;

    fn map(&self, value: &Self::ValueType, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<Self::ValueType> {
        // `x_labels(0)` / `y_labels(0)` ask for none
        if hint.max_num_points() == 0 {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<Self::ValueType> {
        self.inner.range()
    }
}
