//! Pixel synthesis helpers consumed by the transform-coded block decoders.
//!
//! - Fixed-point 8x8 inverse DCT writing straight into a sample plane.
//! - Quality dependent quantization matrices and the Haar coefficient scale.

pub mod dct;
pub mod quantization;

pub use dct::{ZIGZAG_ORDER, idct_put};
pub use quantization::{gen_quant_matrix, haar_scale};
