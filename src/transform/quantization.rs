//! Quantization matrices for DCT blocks and the Haar coefficient scale.

use crate::constants::DCT_COEFFS;
use crate::transform::dct::ZIGZAG_ORDER;

/// Base luminance quantization table (quality 50), natural order.
pub const LUMA_QUANT_TABLE: [u8; DCT_COEFFS] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Base chrominance quantization table (quality 50), natural order.
pub const CHROMA_QUANT_TABLE: [u8; DCT_COEFFS] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Scales the base table for `quality` (1-100) and returns it in zigzag
/// scan order, so entry `k` dequantizes the `k`-th coefficient of the scan.
///
/// Unlike baseline JPEG no lower clamp is applied: quality 100 yields an
/// all-zero matrix.
pub fn gen_quant_matrix(quality: u8, is_luma: bool) -> [u16; DCT_COEFFS] {
    let base = if is_luma { &LUMA_QUANT_TABLE } else { &CHROMA_QUANT_TABLE };
    let quality = quality.max(1) as u32;

    let mut qmat = [0u16; DCT_COEFFS];
    for (entry, &pos) in qmat.iter_mut().zip(ZIGZAG_ORDER.iter()) {
        let q = base[pos] as u32;
        let scaled = if quality >= 50 {
            (q * (200 - 2 * quality) + 50) / 100
        } else {
            (5000 * q / quality + 50) / 100
        };
        *entry = scaled as u16;
    }
    qmat
}

/// Multiplier applied to every decoded Haar coefficient.
pub fn haar_scale(quality: u8) -> i32 {
    17 - 7 * quality as i32 / 50
}
