use crate::block::{clip_u8, decode_coeff};
use crate::constants::{COEFF_CLASSES, MACROBLOCK_SIZE};
use crate::error::Mss3Error;
use crate::model::{AdaptiveModel, ByteModel, SmallModel};
use crate::range_coder::RangeDecoder;
use crate::transform::haar_scale;

/// One-level Haar wavelet blocks.
///
/// Coefficients arrive in raster order over the whole block. The top-left
/// quadrant is the low-pass band and is coded with a byte model; the three
/// detail bands use signed coefficients. Everything is multiplied by a
/// quality dependent scale before reconstruction.
#[derive(Debug, Clone)]
pub struct HaarBlockDecoder {
    quality: Option<u8>,
    scale: i32,
    coef_model: ByteModel,
    coef_hi_model: SmallModel,
    block: [i32; MACROBLOCK_SIZE * MACROBLOCK_SIZE],
}

impl Default for HaarBlockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HaarBlockDecoder {
    pub fn new() -> Self {
        Self {
            quality: None,
            scale: 0,
            coef_model: ByteModel::new(),
            coef_hi_model: SmallModel::new(COEFF_CLASSES),
            block: [0; MACROBLOCK_SIZE * MACROBLOCK_SIZE],
        }
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn set_quality(&mut self, quality: u8) {
        if self.quality != Some(quality) {
            self.quality = Some(quality);
            self.scale = haar_scale(quality);
        }
    }

    pub fn decode(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        dst: &mut [u8],
        stride: usize,
        block_size: usize,
    ) -> Result<(), Mss3Error> {
        if block_size > MACROBLOCK_SIZE || block_size % 2 != 0 {
            return Err(Mss3Error::MalformedBlock);
        }
        let hsize = block_size / 2;

        for j in 0..block_size {
            for i in 0..block_size {
                let coeff = if i < hsize && j < hsize {
                    coder.decode_symbol(&mut self.coef_model) as i32
                } else {
                    decode_coeff(coder, &mut self.coef_hi_model)
                };
                self.block[j * block_size + i] = coeff.wrapping_mul(self.scale);
            }
        }

        let at = |x: usize, y: usize| self.block[y * block_size + x];
        for (j, pair) in dst.chunks_mut(2 * stride).take(hsize).enumerate() {
            if pair.len() <= stride {
                return Err(Mss3Error::MalformedBlock);
            }
            let (top, bottom) = pair.split_at_mut(stride);
            for i in 0..hsize {
                let a = at(i, j);
                let b = at(i + hsize, j);
                let c = at(i, j + hsize);
                let d = at(i + hsize, j + hsize);

                let t1 = a.wrapping_sub(b);
                let t2 = c.wrapping_sub(d);
                let t3 = a.wrapping_add(b);
                let t4 = c.wrapping_add(d);

                top[2 * i] = clip_u8(t1.wrapping_sub(t2));
                top[2 * i + 1] = clip_u8(t3.wrapping_sub(t4));
                bottom[2 * i] = clip_u8(t1.wrapping_add(t2));
                bottom[2 * i + 1] = clip_u8(t3.wrapping_add(t4));
            }
        }
        Ok(())
    }

    /// Resets both models. The scale follows the frame quality and is kept.
    pub fn reset(&mut self) {
        self.coef_model.reset();
        self.coef_hi_model.reset();
    }
}
