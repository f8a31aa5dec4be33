use crate::constants::{MAX_SMALL_SYMBOLS, MODEL_SCALE};
use crate::model::AdaptiveModel;
use crate::model::table::FrequencyTable;
use crate::range_coder::RangeDecoder;

/// Adaptive model over an alphabet of 2 to 16 symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallModel {
    table: FrequencyTable<MAX_SMALL_SYMBOLS>,
}

impl SmallModel {
    pub fn new(num_syms: usize) -> Self {
        Self {
            table: FrequencyTable::new(num_syms),
        }
    }

    pub fn num_symbols(&self) -> usize {
        self.table.num_symbols()
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
        self.table.update(sym);
    }
}

impl AdaptiveModel for SmallModel {
    type Symbol = usize;

    fn decode(&mut self, coder: &mut RangeDecoder<'_>) -> usize {
        let full = coder.range();
        let step = coder.shrink_range(MODEL_SCALE);
        let low = coder.low();

        // Bisection for the last symbol whose scaled start does not exceed low.
        let mut val = 0;
        let mut end2 = self.num_symbols();
        let mut end = end2 >> 1;
        loop {
            if self.table.freq(end) * step <= low {
                val = end;
            } else {
                end2 = end;
            }
            end = (end2 + val) >> 1;
            if end == val {
                break;
            }
        }

        let (lo, hi) = self.table.bounds(val, full, step);
        coder.narrow(lo, hi);
        self.table.update(val);
        val
    }

    fn reset(&mut self) {
        self.table.reset();
    }
}
