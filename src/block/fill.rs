use crate::block::decode_coeff;
use crate::constants::COEFF_CLASSES;
use crate::error::Mss3Error;
use crate::model::{AdaptiveModel, SmallModel};
use crate::range_coder::RangeDecoder;

/// Solid colour blocks. The colour is a running value updated by a coded
/// delta, so consecutive fills of one plane share their history.
#[derive(Debug, Clone)]
pub struct FillBlockDecoder {
    fill_val: i32,
    coef_model: SmallModel,
}

impl Default for FillBlockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FillBlockDecoder {
    pub fn new() -> Self {
        Self {
            fill_val: 0,
            coef_model: SmallModel::new(COEFF_CLASSES),
        }
    }

    #[cfg(test)]
    pub(crate) fn fill_value(&self) -> i32 {
        self.fill_val
    }

    pub fn decode(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        dst: &mut [u8],
        stride: usize,
        block_size: usize,
    ) -> Result<(), Mss3Error> {
        self.fill_val = self
            .fill_val
            .wrapping_add(decode_coeff(coder, &mut self.coef_model));

        // Only the low byte is stored
        let value = self.fill_val as u8;
        for row in dst.chunks_mut(stride).take(block_size) {
            row[..block_size].fill(value);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.fill_val = 0;
        self.coef_model.reset();
    }
}
