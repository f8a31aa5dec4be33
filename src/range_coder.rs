//! Carry-less range decoder.
//!
//! The decoder keeps `low` relative to the bottom of the current interval,
//! so no carry ever has to be propagated back into consumed bytes. Running out
//! of input is not a panic: the sticky error flag is raised, a fixed `low` is
//! substituted and decoding carries on deterministically. Callers inspect
//! [`RangeDecoder::has_error`] once per block.

use crate::constants::RAC_BOTTOM;
use crate::model::AdaptiveModel;

pub struct RangeDecoder<'a> {
    source: &'a [u8],
    cursor: usize,
    end: usize,
    range: u32,
    low: u32,
    error: bool,
}

impl<'a> RangeDecoder<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        let head = source.len().min(4);
        let low = source[..head]
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);

        Self {
            source,
            cursor: head,
            end: source.len(),
            range: 0xFFFF_FFFF,
            low,
            error: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn bytes_consumed(&self) -> usize {
        self.cursor
    }

    /// Decodes one equiprobable bit.
    pub fn get_bit(&mut self) -> bool {
        self.range >>= 1;

        let bit = self.low >= self.range;
        if bit {
            self.low -= self.range;
        }

        if self.range < RAC_BOTTOM {
            self.normalize();
        }
        bit
    }

    /// Decodes an `nbits` wide raw value.
    pub fn get_bits(&mut self, nbits: u32) -> u32 {
        debug_assert!(nbits <= 24);

        self.range >>= nbits;
        let val = self.low / self.range;
        self.low -= self.range * val;

        if self.range < RAC_BOTTOM {
            self.normalize();
        }
        val
    }

    /// Decodes one symbol with `model` and lets the model adapt to it.
    pub fn decode_symbol<M: AdaptiveModel>(&mut self, model: &mut M) -> M::Symbol {
        model.decode(self)
    }

    pub(crate) fn low(&self) -> u32 {
        self.low
    }

    /// Scales the range down by `bits` and returns the per-unit step.
    pub(crate) fn shrink_range(&mut self, bits: u32) -> u32 {
        self.range >>= bits;
        self.range
    }

    /// Moves into the sub-interval `[lo, hi)` of the current interval.
    pub(crate) fn narrow(&mut self, lo: u32, hi: u32) {
        self.low -= lo;
        self.range = hi - lo;

        if self.range < RAC_BOTTOM {
            self.normalize();
        }
    }

    fn normalize(&mut self) {
        while self.range < RAC_BOTTOM {
            self.range <<= 8;
            self.low <<= 8;

            if self.cursor < self.end {
                self.low |= self.source[self.cursor] as u32;
                self.cursor += 1;
            } else {
                self.error = true;
                self.low = 1;
            }

            if self.low > self.range {
                self.error = true;
                self.low = 1;
            }
        }
    }
}
