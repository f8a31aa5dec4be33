pub mod constants;
pub mod error;

pub use block::BlockType;
pub use error::Mss3Error;
pub use frame::{Frame, Plane};
pub use frame_decoder::{DecodeStatus, FrameDecoder, FrameState};
pub use frame_header::FrameHeader;

/// Rectangle of the frame that a packet updates. Luma coordinates; the
/// chroma planes use half of each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whole frame of `width` x `height`.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// Per-frame side information carried by the packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    pub keyframe: bool,
    pub region: Region,
    /// 1 (coarsest) to 100 (finest).
    pub quality: u8,
}

pub mod block;
pub mod frame;
pub mod frame_decoder;
pub mod frame_header;
pub mod model;
pub mod range_coder;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_util;
