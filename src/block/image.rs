use crate::constants::{MACROBLOCK_SIZE, MAX_VEC_SIZE, MIN_VEC_SIZE, VQ_CLASSES, VQ_CONTEXTS};
use crate::error::Mss3Error;
use crate::model::{AdaptiveModel, ByteModel, SmallModel};
use crate::range_coder::RangeDecoder;

/// Palette blocks.
///
/// A block carries 2 to 4 palette entries. Each pixel then codes a class:
/// an index into the palette, or an escape followed by a literal sample. The
/// class model is selected by the classes of the left, top and top-left
/// neighbours within the block, with class 0 standing in outside it.
#[derive(Debug, Clone)]
pub struct ImageBlockDecoder {
    escape_model: ByteModel,
    vec_entry_model: ByteModel,
    vec_size_model: SmallModel,
    vq_models: Vec<SmallModel>,
}

impl Default for ImageBlockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBlockDecoder {
    pub fn new() -> Self {
        Self {
            escape_model: ByteModel::new(),
            vec_entry_model: ByteModel::new(),
            vec_size_model: SmallModel::new(MAX_VEC_SIZE - MIN_VEC_SIZE + 1),
            vq_models: (0..VQ_CONTEXTS).map(|_| SmallModel::new(VQ_CLASSES)).collect(),
        }
    }

    pub fn decode(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        dst: &mut [u8],
        stride: usize,
        block_size: usize,
    ) -> Result<(), Mss3Error> {
        if block_size > MACROBLOCK_SIZE {
            return Err(Mss3Error::MalformedBlock);
        }

        let vec_size = MIN_VEC_SIZE + coder.decode_symbol(&mut self.vec_size_model);
        if vec_size > MAX_VEC_SIZE {
            return Err(Mss3Error::MalformedBlock);
        }
        let mut palette = [0u8; MAX_VEC_SIZE];
        for entry in &mut palette[..vec_size] {
            *entry = coder.decode_symbol(&mut self.vec_entry_model);
        }

        let mut prev_line = [0usize; MACROBLOCK_SIZE];
        for row in dst.chunks_mut(stride).take(block_size) {
            let mut left = 0;
            let mut above = 0;
            for (x, pixel) in row[..block_size].iter_mut().enumerate() {
                let above_left = above;
                above = prev_line[x];

                let ctx = left + above * VQ_CLASSES + above_left * VQ_CLASSES * VQ_CLASSES;
                let model = self.vq_models.get_mut(ctx).ok_or(Mss3Error::MalformedBlock)?;
                left = coder.decode_symbol(model);
                prev_line[x] = left;

                *pixel = match palette[..vec_size].get(left) {
                    Some(&entry) => entry,
                    None => coder.decode_symbol(&mut self.escape_model),
                };
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.escape_model.reset();
        self.vec_entry_model.reset();
        self.vec_size_model.reset();
        for model in &mut self.vq_models {
            model.reset();
        }
    }
}
