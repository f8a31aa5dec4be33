use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::BLOCK_TYPE_COUNT;
use crate::error::Mss3Error;
use crate::model::{AdaptiveModel, SmallModel};
use crate::range_coder::RangeDecoder;

/// Coding method of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Single colour, coded as a delta to the previous fill value.
    Fill = 0,
    /// Small palette with context coded indices and escaped literals.
    Image = 1,
    /// 8x8 DCT sub-blocks.
    Dct = 2,
    /// One level Haar wavelet.
    Haar = 3,
    /// Pixels are kept from the previous frame.
    Skip = 4,
}

/// Chooses the next block type using one model per preceding type.
#[derive(Debug, Clone)]
pub struct BlockTypeSelector {
    models: [SmallModel; BLOCK_TYPE_COUNT],
    last_type: BlockType,
}

impl Default for BlockTypeSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTypeSelector {
    pub fn new() -> Self {
        Self {
            models: std::array::from_fn(|_| SmallModel::new(BLOCK_TYPE_COUNT)),
            last_type: BlockType::Skip,
        }
    }

    pub fn last_type(&self) -> BlockType {
        self.last_type
    }

    pub fn decode(&mut self, coder: &mut RangeDecoder<'_>) -> Result<BlockType, Mss3Error> {
        let model = &mut self.models[self.last_type as usize];
        let sym = coder.decode_symbol(model);
        let block_type = u8::try_from(sym)
            .ok()
            .and_then(|v| BlockType::try_from(v).ok())
            .ok_or(Mss3Error::MalformedBlock)?;

        self.last_type = block_type;
        Ok(block_type)
    }

    pub fn reset(&mut self) {
        for model in &mut self.models {
            model.reset();
        }
        self.last_type = BlockType::Skip;
    }
}
