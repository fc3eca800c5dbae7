//! Core traits for kindle datasets
//!
//! This module defines the element bounds shared by every dataset operation.

use std::fmt::Debug;

/// A data type that can be stored in a dataset.
///
/// Partition-local work may run on a thread pool, so elements must be
/// shareable across threads.
pub trait Data: Send + Sync + Clone + Debug + 'static {}
impl<T> Data for T where T: Send + Sync + Clone + Debug + 'static {}

/// Element types that support `sum` and `average`.
pub trait Numeric: Data + Copy + PartialOrd {
    /// Additive identity, the sum of no elements.
    const ZERO: Self;

    /// Addition that reports overflow as `None`. Floats never overflow; they
    /// saturate to infinity.
    fn checked_add(self, other: Self) -> Option<Self>;

    /// Widen to `f64` for averaging.
    fn to_f64(self) -> f64;
}

macro_rules! impl_numeric_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                const ZERO: Self = 0;

                fn checked_add(self, other: Self) -> Option<Self> {
                    <$t>::checked_add(self, other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                const ZERO: Self = 0.0;

                fn checked_add(self, other: Self) -> Option<Self> {
                    Some(self + other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_numeric_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_numeric_float!(f32, f64);
