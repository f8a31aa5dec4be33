use crate::constants::{BYTE_SYMBOLS, MODEL256_SEC_SCALE, MODEL256_SEC_SIZE, MODEL_SCALE};
use crate::model::AdaptiveModel;
use crate::model::table::FrequencyTable;
use crate::range_coder::RangeDecoder;

/// Adaptive model over all 256 byte values.
///
/// Besides the cumulative table the model keeps a coarse bucket index:
/// `secondary[k]` is the last symbol whose frequency, shifted right by
/// [`MODEL256_SEC_SCALE`], is still below `k`. A lookup first picks the bucket
/// of the scaled coder value and then bisects only between two neighbouring
/// bucket entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteModel {
    table: FrequencyTable<BYTE_SYMBOLS>,
    secondary: [u8; MODEL256_SEC_SIZE],
}

impl Default for ByteModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteModel {
    pub fn new() -> Self {
        let mut model = Self {
            table: FrequencyTable::new(BYTE_SYMBOLS),
            secondary: [0; MODEL256_SEC_SIZE],
        };
        model.rebuild_secondary();
        model
    }

    pub(crate) fn freqs(&self) -> &[u32] {
        self.table.freqs()
    }

    pub(crate) fn total_weight(&self) -> u32 {
        self.table.total_weight()
    }

    pub(crate) fn bounds(&self, sym: usize, full: u32, step: u32) -> (u32, u32) {
        self.table.bounds(sym, full, step)
    }

    pub(crate) fn update(&mut self, sym: usize) {
        if self.table.update(sym) {
            self.rebuild_secondary();
        }
    }

    /// Finds the symbol whose scaled interval contains `helper`.
    pub(crate) fn find(&self, helper: u32) -> usize {
        let bucket = ((helper >> MODEL256_SEC_SCALE) as usize).min(MODEL256_SEC_SIZE - 2);

        let mut val = self.secondary[bucket] as usize;
        let mut start = self.secondary[bucket + 1] as usize + 1;
        let mut end = start;
        while end > val + 1 {
            let mid = (end + val) >> 1;
            if self.table.freq(mid) <= helper {
                end = start;
                val = mid;
            } else {
                end = mid;
                start = mid;
            }
        }
        val
    }

    fn rebuild_secondary(&mut self) {
        self.secondary[0] = 0;
        let mut sidx = 1;
        for (sym, &freq) in self.table.freqs().iter().enumerate() {
            let send = (freq >> MODEL256_SEC_SCALE) as usize;
            while sidx <= send {
                self.secondary[sidx] = sym.saturating_sub(1) as u8;
                sidx += 1;
            }
        }
        self.secondary[sidx..].fill(u8::MAX);
    }
}

impl AdaptiveModel for ByteModel {
    type Symbol = u8;

    fn decode(&mut self, coder: &mut RangeDecoder<'_>) -> u8 {
        let full = coder.range();
        let step = coder.shrink_range(MODEL_SCALE);
        let val = self.find(coder.low() / step);

        let (lo, hi) = self.table.bounds(val, full, step);
        coder.narrow(lo, hi);
        self.update(val);
        val as u8
    }

    fn reset(&mut self) {
        self.table.reset();
        self.rebuild_secondary();
    }
}
