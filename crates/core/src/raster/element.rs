//! Raster element trait for generic sample values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// The domain bounds double as the identities of the morphological
/// operators: erosion starts from [`max_value`](RasterElement::max_value),
/// dilation from [`min_value`](RasterElement::min_value). For floats these
/// are the infinities, so every finite sample beats them.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Lowest value a sample of this type can take
    fn min_value() -> Self;

    /// Highest value a sample of this type can take
    fn max_value() -> Self;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// `self - other`, or zero when `self <= other`.
    ///
    /// Used by the difference transforms so unsigned samples never wrap.
    fn saturating_diff(self, other: Self) -> Self;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }

            fn max_value() -> Self {
                <$t>::MAX
            }

            fn is_float() -> bool {
                false
            }

            fn saturating_diff(self, other: Self) -> Self {
                if self > other {
                    self.saturating_sub(other)
                } else {
                    0
                }
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn min_value() -> Self {
                <$t>::NEG_INFINITY
            }

            fn max_value() -> Self {
                <$t>::INFINITY
            }

            fn is_float() -> bool {
                true
            }

            fn saturating_diff(self, other: Self) -> Self {
                if self > other {
                    self - other
                } else {
                    0.0
                }
            }
        }
    };
}

impl_raster_element_int!(i8);
impl_raster_element_int!(i16);
impl_raster_element_int!(i32);
impl_raster_element_int!(i64);
impl_raster_element_int!(u8);
impl_raster_element_int!(u16);
impl_raster_element_int!(u32);
impl_raster_element_int!(u64);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_bounds() {
        assert_eq!(<u16 as RasterElement>::max_value(), 65535);
        assert_eq!(<u16 as RasterElement>::min_value(), 0);
        assert_eq!(<i8 as RasterElement>::min_value(), -128);
        assert!(!<u8 as RasterElement>::is_float());
    }

    #[test]
    fn test_float_bounds_are_infinite() {
        assert_eq!(<f32 as RasterElement>::max_value(), f32::INFINITY);
        assert_eq!(<f64 as RasterElement>::min_value(), f64::NEG_INFINITY);
        assert!(<f64 as RasterElement>::is_float());
    }

    #[test]
    fn test_saturating_diff() {
        assert_eq!(3u8.saturating_diff(5), 0);
        assert_eq!(5u8.saturating_diff(3), 2);
        assert_eq!(i8::MAX.saturating_diff(i8::MIN), i8::MAX);
        assert_eq!(2.5f64.saturating_diff(1.0), 1.5);
        assert_eq!(1.0f32.saturating_diff(2.0), 0.0);
    }
}
