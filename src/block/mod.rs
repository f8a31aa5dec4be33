//! Per-plane block decoders.
//!
//! Every plane of a frame owns one instance of each decoder below. A block is
//! 16x16 on the luma plane and 8x8 on the chroma planes; its [`BlockType`] is
//! chosen by a [`BlockTypeSelector`] conditioned on the previous block of the
//! same plane.

pub mod block_type;
pub mod dct;
pub mod fill;
pub mod haar;
pub mod image;

pub use block_type::{BlockType, BlockTypeSelector};
pub use dct::DctBlockDecoder;
pub use fill::FillBlockDecoder;
pub use haar::HaarBlockDecoder;
pub use image::ImageBlockDecoder;

use crate::model::SmallModel;
use crate::range_coder::RangeDecoder;

/// Decodes a signed coefficient.
///
/// The model yields a magnitude class `c`: 0 is the value zero, 1 is a unit
/// magnitude and larger classes carry `c - 1` extra raw bits below an implicit
/// leading one. Non-zero values are preceded by a raw sign bit, set meaning
/// negative.
pub fn decode_coeff(coder: &mut RangeDecoder<'_>, model: &mut SmallModel) -> i32 {
    let class = coder.decode_symbol(model) as u32;
    if class == 0 {
        return 0;
    }

    let negative = coder.get_bit();
    apply_sign(expand_magnitude(coder, class), negative)
}

/// Magnitude for a non-zero `class` (at most 15).
pub(crate) fn expand_magnitude(coder: &mut RangeDecoder<'_>, class: u32) -> i32 {
    if class > 1 {
        let bits = class - 1;
        (1u32 << bits).wrapping_add(coder.get_bits(bits)) as i32
    } else {
        class as i32
    }
}

pub(crate) fn apply_sign(magnitude: i32, negative: bool) -> i32 {
    if negative { magnitude.wrapping_neg() } else { magnitude }
}

pub(crate) fn clip_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
