//! Frame level driver.
//!
//! A [`FrameDecoder`] owns the committed reference picture and one set of
//! block decoders per plane. Each packet updates a macroblock aligned region
//! of the picture. Decoding runs on a scratch copy of the reference, so a
//! frame that fails half way leaves the last good picture untouched.

use log::{debug, trace, warn};

use crate::block::{
    BlockType, BlockTypeSelector, DctBlockDecoder, FillBlockDecoder, HaarBlockDecoder,
    ImageBlockDecoder,
};
use crate::constants::{CHROMA_BLOCK_SIZE, MACROBLOCK_SIZE, MAX_QUALITY, MIN_QUALITY, PLANE_COUNT};
use crate::error::Mss3Error;
use crate::frame::Frame;
use crate::frame_header::FrameHeader;
use crate::range_coder::RangeDecoder;
use crate::{FrameParams, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame has been attempted yet.
    Idle,
    Decoding,
    /// The last frame was decoded and is now the reference.
    Committed,
    /// The last frame failed; the reference predates it.
    Aborted,
}

/// Outcome of a successful [`FrameDecoder::decode_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The payload was decoded into a new reference picture.
    Decoded,
    /// Nothing was decoded and the reference picture is repeated.
    Repeated,
}

#[derive(Debug, Clone)]
struct PlaneDecoder {
    block_type: BlockTypeSelector,
    fill: FillBlockDecoder,
    image: ImageBlockDecoder,
    dct: DctBlockDecoder,
    haar: HaarBlockDecoder,
}

impl PlaneDecoder {
    fn new(plane_width: usize, plane_height: usize, is_luma: bool) -> Self {
        Self {
            block_type: BlockTypeSelector::new(),
            fill: FillBlockDecoder::new(),
            image: ImageBlockDecoder::new(),
            dct: DctBlockDecoder::new(plane_width, plane_height, is_luma),
            haar: HaarBlockDecoder::new(),
        }
    }

    fn reset(&mut self) {
        self.block_type.reset();
        self.fill.reset();
        self.image.reset();
        self.dct.reset();
        self.haar.reset();
    }

    fn set_quality(&mut self, quality: u8) {
        self.dct.set_quality(quality);
        self.haar.set_quality(quality);
    }

    fn decode_block(
        &mut self,
        coder: &mut RangeDecoder<'_>,
        dst: &mut [u8],
        stride: usize,
        block_size: usize,
        mb_x: usize,
        mb_y: usize,
    ) -> Result<(), Mss3Error> {
        match self.block_type.decode(coder)? {
            BlockType::Fill => self.fill.decode(coder, dst, stride, block_size),
            BlockType::Image => self.image.decode(coder, dst, stride, block_size),
            BlockType::Dct => self.dct.decode(coder, dst, stride, block_size, mb_x, mb_y),
            BlockType::Haar => self.haar.decode(coder, dst, stride, block_size),
            BlockType::Skip => Ok(()),
        }
    }
}

/// Decoder for one MSS3 stream.
pub struct FrameDecoder {
    width: u32,
    height: u32,
    reference: Frame,
    scratch: Frame,
    planes: [PlaneDecoder; PLANE_COUNT],
    error: bool,
    seen_keyframe: bool,
    state: FrameState,
}

impl FrameDecoder {
    /// Creates a decoder for pictures of `width` x `height` luma samples.
    pub fn new(width: u32, height: u32) -> Result<Self, Mss3Error> {
        if width == 0 || height == 0 {
            return Err(Mss3Error::InvalidDimensions);
        }

        let reference = Frame::new(width as usize, height as usize);
        let planes = std::array::from_fn(|index| {
            let plane = reference.plane(index);
            PlaneDecoder::new(plane.width(), plane.height(), index == 0)
        });

        Ok(Self {
            width,
            height,
            scratch: reference.clone(),
            reference,
            planes,
            error: false,
            seen_keyframe: false,
            state: FrameState::Idle,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The last committed picture.
    pub fn frame(&self) -> &Frame {
        &self.reference
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Whether the last decoded frame failed. Inter frames are ignored until
    /// the next keyframe clears the flag.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Returns every model to its initial state and clears the DC history.
    /// The reference picture and the quality caches are kept.
    pub fn reset_for_keyframe(&mut self) {
        trace!("resetting all models for keyframe");
        for plane in &mut self.planes {
            plane.reset();
        }
    }

    /// Parses the packet header and decodes the payload behind it.
    pub fn decode_packet(&mut self, packet: &[u8]) -> Result<DecodeStatus, Mss3Error> {
        let (header, payload) = FrameHeader::parse(packet)?;
        self.decode_frame(&header.params, payload)
    }

    /// Decodes one frame payload (header already stripped).
    pub fn decode_frame(
        &mut self,
        params: &FrameParams,
        payload: &[u8],
    ) -> Result<DecodeStatus, Mss3Error> {
        self.validate(params)?;

        if !params.keyframe {
            if self.error {
                debug!("inter frame skipped after a decode error");
                return Ok(DecodeStatus::Repeated);
            }
            if !self.seen_keyframe {
                return Err(Mss3Error::KeyframeRequired);
            }
        }

        debug!(
            "frame: keyframe={} region={:?} quality={} payload={} bytes",
            params.keyframe,
            params.region,
            params.quality,
            payload.len()
        );

        if params.keyframe {
            self.seen_keyframe = true;
            self.error = false;
            self.reset_for_keyframe();
        }

        if payload.is_empty() {
            self.state = FrameState::Committed;
            return Ok(DecodeStatus::Repeated);
        }

        for plane in &mut self.planes {
            plane.set_quality(params.quality);
        }

        self.state = FrameState::Decoding;
        self.scratch.copy_from(&self.reference);
        match self.decode_region(params.region, payload) {
            Ok(consumed) => {
                std::mem::swap(&mut self.reference, &mut self.scratch);
                self.state = FrameState::Committed;
                debug!("frame committed, {} of {} bytes consumed", consumed, payload.len());
                Ok(DecodeStatus::Decoded)
            }
            Err(err) => {
                self.error = true;
                self.state = FrameState::Aborted;
                Err(err)
            }
        }
    }

    fn validate(&self, params: &FrameParams) -> Result<(), Mss3Error> {
        let region = params.region;
        let fits = |pos: u32, len: u32, limit: u32| {
            pos.checked_add(len).is_some_and(|end| end <= limit)
        };

        if region.width % MACROBLOCK_SIZE as u32 != 0
            || region.height % MACROBLOCK_SIZE as u32 != 0
            || !fits(region.x, region.width, self.width)
            || !fits(region.y, region.height, self.height)
        {
            return Err(Mss3Error::InvalidRegion);
        }

        if !(MIN_QUALITY..=MAX_QUALITY).contains(&params.quality) {
            return Err(Mss3Error::InvalidQuality);
        }
        Ok(())
    }

    /// Walks the macroblocks of `region` in raster order, one block per plane
    /// each. Returns the number of payload bytes consumed.
    fn decode_region(&mut self, region: Region, payload: &[u8]) -> Result<usize, Mss3Error> {
        let mut coder = RangeDecoder::new(payload);
        let mb_cols = region.width as usize / MACROBLOCK_SIZE;
        let mb_rows = region.height as usize / MACROBLOCK_SIZE;

        for mb_y in 0..mb_rows {
            for mb_x in 0..mb_cols {
                for (index, decoder) in self.planes.iter_mut().enumerate() {
                    let (block_size, shift) = if index == 0 {
                        (MACROBLOCK_SIZE, 0)
                    } else {
                        (CHROMA_BLOCK_SIZE, 1)
                    };
                    let x = (region.x as usize >> shift) + mb_x * block_size;
                    let y = (region.y as usize >> shift) + mb_y * block_size;

                    let plane = self.scratch.plane_mut(index);
                    let stride = plane.stride();
                    let result = match plane.tail_mut(x, y) {
                        Some(dst) => {
                            decoder.decode_block(&mut coder, dst, stride, block_size, mb_x, mb_y)
                        }
                        None => Err(Mss3Error::MalformedBlock),
                    };

                    // Running dry trumps whatever the block made of the filler
                    let result = if coder.has_error() {
                        Err(Mss3Error::TruncatedInput)
                    } else {
                        result
                    };
                    if let Err(err) = result {
                        warn!(
                            "frame aborted at macroblock ({}, {}) plane {}: {}",
                            mb_x, mb_y, index, err
                        );
                        return Err(err);
                    }
                }
            }
        }
        Ok(coder.bytes_consumed())
    }
}
