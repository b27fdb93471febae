//! Image normalization via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Grayscale** | `DynamicImage::to_luma8` |
//! | **Bounded resize** | `DynamicImage::resize_exact` with `FilterType::Triangle` (bilinear) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`SizeBound`], the caller-supplied size limit
//! - **Normalize**: The operations themselves, consuming and returning images

mod calculations;
mod normalize;
mod params;

pub use calculations::{calculate_bounded_dimensions, reduction_factor};
pub use normalize::{bound_size, to_grayscale};
pub use params::SizeBound;
