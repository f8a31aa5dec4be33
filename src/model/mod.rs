//! Self-adapting probability models driven by the range decoder.
//!
//! Three variants exist: a 2-symbol [`BinaryModel`], a [`SmallModel`] for
//! alphabets of up to 16 symbols and a 256-symbol [`ByteModel`]. They share one
//! update shape: every observation bumps a weight, and once `upd_val`
//! observations have been seen the cumulative table is rebuilt, halving the
//! weights first when the total passes the model's ceiling.

pub mod binary;
pub mod byte;
pub mod small;
mod table;

pub use binary::BinaryModel;
pub use byte::ByteModel;
pub use small::SmallModel;

use crate::range_coder::RangeDecoder;

pub trait AdaptiveModel {
    type Symbol: Copy;

    /// Decodes one symbol and adapts the model to it.
    fn decode(&mut self, coder: &mut RangeDecoder<'_>) -> Self::Symbol;

    /// Returns the model to its initial uniform distribution.
    fn reset(&mut self);
}
