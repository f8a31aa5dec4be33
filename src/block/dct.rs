use log::trace;

use crate::block::{apply_sign, decode_coeff, expand_magnitude};
use crate::constants::{AC_END_OF_BLOCK, AC_ZERO_RUN, COEFF_CLASSES, DCT_COEFFS, DCT_SIZE};
use crate::error::Mss3Error;
use crate::model::{AdaptiveModel, BinaryModel, ByteModel, SmallModel};
use crate::range_coder::RangeDecoder;
use crate::transform::{ZIGZAG_ORDER, gen_quant_matrix, idct_put};

/// DCT blocks: each 8x8 sub-block codes a predicted DC delta followed by
/// run-length coded AC coefficients in zigzag order.
///
/// The DC of every decoded sub-block is remembered per plane, indexed by the
/// sub-block's position within the coded region, and serves as the
/// prediction source for its right and lower neighbours.
#[derive(Debug, Clone)]
pub struct DctBlockDecoder {
    is_luma: bool,
    quality: Option<u8>,
    qmat: [u16; DCT_COEFFS],
    prev_dc: Vec<i32>,
    prev_dc_stride: usize,
    prev_dc_height: usize,
    dc_model: SmallModel,
    sign_model: BinaryModel,
    ac_model: ByteModel,
    block: [i32; DCT_COEFFS],
}

impl DctBlockDecoder {
    /// Creates a decoder for a plane of `plane_width` x `plane_height`
    /// samples.
    pub fn new(plane_width: usize, plane_height: usize, is_luma: bool) -> Self {
        let prev_dc_stride = plane_width / DCT_SIZE;
        let prev_dc_height = plane_height / DCT_SIZE;
        Self {
            is_luma,
            quality: None,
            qmat: [0; DCT_COEFFS],
            prev_dc: vec![0; prev_dc_stride * prev_dc_height],
            prev_dc_stride,
            prev_dc_height,
            dc_model: SmallModel::new(COEFF_CLASSES),
            sign_model: BinaryModel::new(),
            ac_model: ByteModel::new(),
            block: [0; DCT_COEFFS],
        }
    }

    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    /// Zigzag-ordered dequantization matrix in use.
    pub fn quant_matrix(&self) -> &[u16; DCT_COEFFS] {
        &self.qmat
    }

    /// Regenerates the quantization matrix when `quality` changed.
    pub fn set_quality(&mut self, quality: u8) {
        if self.quality == Some(quality) {
            return;
        }
        trace!(
            "{} quant matrix regenerated for quality {}",
            if self.is_luma { "luma" } else { "chroma" },
            quality
        );
        self.quality = Some(quality);
        self.qmat = gen_quant_matrix(quality, self.is_luma);
    }

    /// Decodes the `block_size / 8` squared sub-blocks of the block at
    /// macroblock position (`mb_x`, `mb_y`) of the region.
    pub fn decode(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        dst: &mut [u8],
        stride: usize,
        block_size: usize,
        mb_x: usize,
        mb_y: usize,
    ) -> Result<(), Mss3Error> {
        let nblocks = block_size / DCT_SIZE;
        let base_x = mb_x * nblocks;
        let base_y = mb_y * nblocks;

        for (j, band) in dst.chunks_mut(DCT_SIZE * stride).take(nblocks).enumerate() {
            for i in 0..nblocks {
                self.decode_sub_block(coder, base_x + i, base_y + j)?;
                let target = band
                    .get_mut(i * DCT_SIZE..)
                    .ok_or(Mss3Error::MalformedBlock)?;
                idct_put(target, stride, &mut self.block);
            }
        }
        Ok(())
    }

    fn decode_sub_block(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        bx: usize,
        by: usize,
    ) -> Result<(), Mss3Error> {
        self.block = [0; DCT_COEFFS];

        let dc = decode_coeff(coder, &mut self.dc_model).wrapping_add(self.predict_dc(bx, by)?);
        self.prev_dc[by * self.prev_dc_stride + bx] = dc;
        self.block[0] = dc.wrapping_mul(self.qmat[0] as i32);

        let mut pos = 1;
        while pos < DCT_COEFFS {
            let token = coder.decode_symbol(&mut self.ac_model);
            if token == AC_END_OF_BLOCK {
                return Ok(());
            }
            if token == AC_ZERO_RUN {
                pos += 16;
                continue;
            }

            let skip = (token >> 4) as usize;
            let class = (token & 0xF) as u32;
            if class == 0 {
                return Err(Mss3Error::MalformedBlock);
            }
            pos += skip;
            if pos >= DCT_COEFFS {
                return Err(Mss3Error::MalformedBlock);
            }

            let negative = coder.decode_symbol(&mut self.sign_model);
            let level = apply_sign(expand_magnitude(coder, class), negative);
            self.block[ZIGZAG_ORDER[pos]] = level.wrapping_mul(self.qmat[pos] as i32);
            pos += 1;
        }

        if pos == DCT_COEFFS {
            Ok(())
        } else {
            Err(Mss3Error::MalformedBlock)
        }
    }

    /// Predicts from the decoded neighbours: the top one when the change
    /// from top-left to top is no larger than from top-left to left.
    fn predict_dc(&self, bx: usize, by: usize) -> Result<i32, Mss3Error> {
        if bx >= self.prev_dc_stride || by >= self.prev_dc_height {
            return Err(Mss3Error::MalformedBlock);
        }
        let at = |x: usize, y: usize| self.prev_dc[y * self.prev_dc_stride + x];

        Ok(match (bx > 0, by > 0) {
            (true, true) => {
                let left = at(bx - 1, by);
                let top = at(bx, by - 1);
                let top_left = at(bx - 1, by - 1);
                if top.wrapping_sub(top_left).unsigned_abs()
                    <= left.wrapping_sub(top_left).unsigned_abs()
                {
                    top
                } else {
                    left
                }
            }
            (false, true) => at(bx, by - 1),
            (true, false) => at(bx - 1, by),
            (false, false) => 0,
        })
    }

    /// Resets the models and forgets all DC history. The quality cache is
    /// kept.
    pub fn reset(&mut self) {
        self.dc_model.reset();
        self.sign_model.reset();
        self.ac_model.reset();
        self.prev_dc.fill(0);
    }
}
