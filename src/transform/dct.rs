//! Fixed-point 8x8 inverse DCT.
//!
//! All intermediate arithmetic is performed modulo 2^32 so corrupt
//! coefficients produce garbage pixels rather than overflow panics.

use std::num::Wrapping;

use crate::constants::{DCT_COEFFS, DCT_SIZE};

/// Natural-order index of the `k`-th coefficient of the zigzag scan.
pub const ZIGZAG_ORDER: [usize; DCT_COEFFS] = [
    0, 1, 8, 16, 9, 2, 3, 10,
    17, 24, 32, 25, 18, 11, 4, 5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6, 7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

#[derive(Debug, Clone, Copy)]
enum Pass {
    Row,
    Column,
}

impl Pass {
    fn scale_even(self, a: Wrapping<u32>) -> Wrapping<u32> {
        match self {
            Pass::Row => a * Wrapping(1u32 << 16) + Wrapping(0x2000u32),
            Pass::Column => (a + Wrapping(32u32)) * Wrapping(1u32 << 16),
        }
    }

    fn shift(self) -> u32 {
        match self {
            Pass::Row => 13,
            Pass::Column => 22,
        }
    }
}

fn idct_1d(block: &mut [i32; DCT_COEFFS], base: usize, step: usize, pass: Pass) {
    let b = |k: usize| Wrapping(block[base + k * step] as u32);
    let (b0, b1, b2, b3) = (b(0), b(1), b(2), b(3));
    let (b4, b5, b6, b7) = (b(4), b(5), b(6), b(7));
    let zero = Wrapping(0u32);

    let t0 = zero - Wrapping(39409u32) * b7 - Wrapping(58980u32) * b1;
    let t1 = Wrapping(39410u32) * b1 - Wrapping(58980u32) * b7;
    let t2 = zero - Wrapping(33410u32) * b5 - Wrapping(167963u32) * b3;
    let t3 = Wrapping(33410u32) * b3 - Wrapping(167963u32) * b5;
    let t4 = b3 + b7;
    let t5 = b1 + b5;
    let t6 = Wrapping(77062u32) * t4 + Wrapping(51491u32) * t5;
    let t7 = Wrapping(77062u32) * t5 - Wrapping(51491u32) * t4;
    let t8 = Wrapping(35470u32) * b2 - Wrapping(85623u32) * b6;
    let t9 = Wrapping(35470u32) * b6 + Wrapping(85623u32) * b2;
    let ta = pass.scale_even(b0 - b4);
    let tb = pass.scale_even(b0 + b4);

    let out = [
        t1 + t6 + t9 + tb,
        t3 + t7 + t8 + ta,
        t2 + t6 - t8 + ta,
        t0 + t7 - t9 + tb,
        zero - (t0 + t7) - t9 + tb,
        zero - (t2 + t6) - t8 + ta,
        zero - (t3 + t7) + t8 + ta,
        zero - (t1 + t6) + t9 + tb,
    ];
    let shift = pass.shift();
    for (k, v) in out.iter().enumerate() {
        block[base + k * step] = (v.0 as i32) >> shift;
    }
}

/// Inverse transforms `block` (natural order, already dequantized) and
/// writes the 8x8 result, biased by 128 and clipped to 0..=255, to `dst`.
///
/// `block` is used as scratch space and holds the unbiased samples on return.
pub fn idct_put(dst: &mut [u8], stride: usize, block: &mut [i32; DCT_COEFFS]) {
    for row in 0..DCT_SIZE {
        idct_1d(block, row * DCT_SIZE, 1, Pass::Row);
    }
    for col in 0..DCT_SIZE {
        idct_1d(block, col, DCT_SIZE, Pass::Column);
    }

    for (line, samples) in dst
        .chunks_mut(stride)
        .take(DCT_SIZE)
        .zip(block.chunks_exact(DCT_SIZE))
    {
        for (pixel, &v) in line[..DCT_SIZE].iter_mut().zip(samples) {
            *pixel = (v + 128).clamp(0, 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(block: &mut [i32; DCT_COEFFS]) -> [u8; DCT_COEFFS] {
        let mut out = [0u8; DCT_COEFFS];
        idct_put(&mut out, DCT_SIZE, block);
        out
    }

    #[test]
    fn test_zigzag_is_permutation() {
        let mut seen = [false; DCT_COEFFS];
        for &pos in &ZIGZAG_ORDER {
            assert!(!seen[pos]);
            seen[pos] = true;
        }
        assert_eq!(ZIGZAG_ORDER[2], 8);
        assert_eq!(ZIGZAG_ORDER[63], 63);
    }

    #[test]
    fn test_zero_block_is_mid_grey() {
        let out = render(&mut [0; DCT_COEFFS]);
        assert!(out.iter().all(|&p| p == 128));
    }

    #[test]
    fn test_dc_only_is_flat_along_rows() {
        for dc in [-1024, -80, -8, 8, 80, 800] {
            let mut block = [0; DCT_COEFFS];
            block[0] = dc;
            let out = render(&mut block);
            for row in out.chunks_exact(DCT_SIZE) {
                assert!(row.iter().all(|&p| p == row[0]), "dc {}", dc);
                // Rounding bias of the zero rows moves samples by at most one
                let level = (128 + dc / 8).clamp(0, 255);
                assert!((row[0] as i32 - level).abs() <= 1, "dc {}", dc);
            }
        }
    }

    #[test]
    fn test_horizontal_frequency_falls_left_to_right() {
        let mut block = [0; DCT_COEFFS];
        block[0] = 64;
        block[1] = 120;
        let out = render(&mut block);
        for row in out.chunks_exact(DCT_SIZE) {
            assert!(row[0] > row[7]);
        }
    }

    #[test]
    fn test_writes_only_inside_block() {
        let mut block = [0; DCT_COEFFS];
        block[0] = 40;
        block[9] = -30;
        let reference = render(&mut block.clone());

        let stride = 20;
        let mut plane = vec![7u8; stride * 9];
        idct_put(&mut plane[stride + 3..], stride, &mut block);

        for y in 0..9 {
            for x in 0..stride {
                let inside = (1..9).contains(&y) && (3..11).contains(&x);
                let expected = if inside {
                    reference[(y - 1) * DCT_SIZE + x - 3]
                } else {
                    7
                };
                assert_eq!(plane[y * stride + x], expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_extreme_coefficients_do_not_panic() {
        let mut block = [i32::MAX; DCT_COEFFS];
        block[5] = i32::MIN;
        let _ = render(&mut block);
    }
}
