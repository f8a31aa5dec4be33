use crate::constants::MODEL_CEILING;

/// Weights and cumulative frequencies shared by the small and byte models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrequencyTable<const N: usize> {
    weights: [u32; N],
    freqs: [u32; N],
    num_syms: usize,
    tot_weight: u32,
    upd_val: u32,
    max_upd_val: u32,
    till_rescale: u32,
}

impl<const N: usize> FrequencyTable<N> {
    pub(crate) fn new(num_syms: usize) -> Self {
        debug_assert!((2..=N).contains(&num_syms));

        let mut table = Self {
            weights: [0; N],
            freqs: [0; N],
            num_syms,
            tot_weight: 0,
            upd_val: 0,
            max_upd_val: 8 * num_syms as u32 + 48,
            till_rescale: 0,
        };
        table.reset();
        table
    }

    pub(crate) fn reset(&mut self) {
        let closing = self.num_syms - 1;

        self.weights = [0; N];
        self.weights[..closing].fill(1);
        self.tot_weight = 0;

        // The closing symbol's observation forces the first table build.
        self.upd_val = self.num_syms as u32;
        self.till_rescale = 1;
        self.update(closing);

        self.upd_val = (self.num_syms as u32 + 6) >> 1;
        self.till_rescale = self.upd_val;
    }

    /// Records one observation of `sym`. Returns `true` when the cumulative
    /// table was rebuilt.
    pub(crate) fn update(&mut self, sym: usize) -> bool {
        self.weights[sym] += 1;
        self.till_rescale -= 1;
        if self.till_rescale != 0 {
            return false;
        }

        let n = self.num_syms;
        self.tot_weight += self.upd_val;
        if self.tot_weight > MODEL_CEILING {
            for weight in &mut self.weights[..n] {
                *weight = (*weight + 1) >> 1;
            }
            if self.weights[n - 1] == 0 {
                self.weights[n - 1] = 1;
            }
            self.tot_weight = self.weights[..n].iter().sum();
        }

        let scale = 0x8000_0000u32 / self.tot_weight;
        let mut sum = 0u32;
        for (freq, &weight) in self.freqs[..n].iter_mut().zip(&self.weights[..n]) {
            *freq = (sum * scale) >> 16;
            sum += weight;
        }

        self.upd_val = ((self.upd_val * 5) >> 2).min(self.max_upd_val);
        self.till_rescale = self.upd_val;
        true
    }

    pub(crate) fn num_symbols(&self) -> usize {
        self.num_syms
    }

    pub(crate) fn freq(&self, sym: usize) -> u32 {
        self.freqs[sym]
    }

    pub(crate) fn freqs(&self) -> &[u32] {
        &self.freqs[..self.num_syms]
    }

    pub(crate) fn total_weight(&self) -> u32 {
        self.tot_weight
    }

    /// Interval of `sym` for a coder whose range was `full` before being
    /// divided into `step` sized units.
    pub(crate) fn bounds(&self, sym: usize, full: u32, step: u32) -> (u32, u32) {
        let lo = self.freqs[sym] * step;
        let hi = if sym + 1 < self.num_syms {
            self.freqs[sym + 1] * step
        } else {
            full
        };
        (lo, hi)
    }
}
