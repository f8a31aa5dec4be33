use crate::constants::{BINARY_MODEL_CEILING, MODEL2_SCALE};
use crate::model::AdaptiveModel;
use crate::range_coder::RangeDecoder;

const MAX_UPD_VAL: u32 = 8 * 2 + 48;

/// Adaptive two-symbol model with 13-bit probability precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryModel {
    upd_val: u32,
    till_rescale: u32,
    zero_freq: u32,
    zero_weight: u32,
    total_freq: u32,
    total_weight: u32,
}

impl Default for BinaryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryModel {
    pub fn new() -> Self {
        let mut model = Self {
            upd_val: 0,
            till_rescale: 0,
            zero_freq: 0,
            zero_weight: 0,
            total_freq: 0,
            total_weight: 0,
        };
        model.reset();
        model
    }

    pub fn zero_freq(&self) -> u32 {
        self.zero_freq
    }

    pub fn total_freq(&self) -> u32 {
        self.total_freq
    }

    /// Size of the zero sub-interval for a coder range of `range`.
    pub(crate) fn split(&self, range: u32) -> u32 {
        self.zero_freq * (range >> MODEL2_SCALE)
    }

    pub(crate) fn update(&mut self, bit: bool) {
        if !bit {
            self.zero_weight += 1;
        }
        self.till_rescale -= 1;
        if self.till_rescale != 0 {
            return;
        }

        self.total_weight += self.upd_val;
        if self.total_weight > BINARY_MODEL_CEILING {
            self.total_weight = (self.total_weight + 1) >> 1;
            self.zero_weight = (self.zero_weight + 1) >> 1;
            if self.total_weight == self.zero_weight {
                self.total_weight = self.zero_weight + 1;
            }
        }

        self.upd_val = ((self.upd_val * 5) >> 2).min(MAX_UPD_VAL);
        let scale = 0x8000_0000u32 / self.total_weight;
        self.zero_freq = (self.zero_weight * scale) >> 18;
        self.total_freq = (self.total_weight * scale) >> 18;
        self.till_rescale = self.upd_val;
    }
}

impl AdaptiveModel for BinaryModel {
    type Symbol = bool;

    fn decode(&mut self, coder: &mut RangeDecoder<'_>) -> bool {
        let full = coder.range();
        let helper = self.split(full);

        let bit = coder.low() >= helper;
        if bit {
            coder.narrow(helper, full);
        } else {
            coder.narrow(0, helper);
        }

        self.update(bit);
        bit
    }

    fn reset(&mut self) {
        self.zero_weight = 1;
        self.total_weight = 2;
        self.zero_freq = 0x1000;
        self.total_freq = 0x2000;
        self.upd_val = 4;
        self.till_rescale = 4;
    }
}
