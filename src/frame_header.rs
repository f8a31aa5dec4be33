//! Packet header preceding every frame payload.
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | frame type, bit 0 set for inter frames  |
//! | 4      | 6    | reserved                                |
//! | 10     | 8    | region x, y, width, height (`u16` each) |
//! | 18     | 4    | reserved                                |
//! | 22     | 1    | quality                                 |
//! | 23     | 4    | reserved                                |
//!
//! All multi-byte fields are big-endian.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use crate::constants::{FRAME_TYPE_MASK, HEADER_SIZE};
use crate::error::Mss3Error;
use crate::{FrameParams, Region};

const REGION_OFFSET: u64 = 10;
const QUALITY_OFFSET: u64 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub frame_type: u32,
    pub params: FrameParams,
}

impl FrameHeader {
    /// Parses the header and returns it together with the payload.
    pub fn parse(packet: &[u8]) -> Result<(Self, &[u8]), Mss3Error> {
        let (head, payload) = packet
            .split_at_checked(HEADER_SIZE)
            .ok_or(Mss3Error::InvalidHeader)?;
        let mut reader = Cursor::new(head);

        let frame_type = reader
            .read_u32::<BigEndian>()
            .map_err(|_| Mss3Error::InvalidHeader)?;
        if frame_type & !FRAME_TYPE_MASK != 0 {
            return Err(Mss3Error::InvalidFrameType);
        }

        reader.set_position(REGION_OFFSET);
        let mut fields = [0u16; 4];
        for field in &mut fields {
            *field = reader
                .read_u16::<BigEndian>()
                .map_err(|_| Mss3Error::InvalidHeader)?;
        }
        let [x, y, width, height] = fields;

        reader.set_position(QUALITY_OFFSET);
        let quality = reader.read_u8().map_err(|_| Mss3Error::InvalidHeader)?;

        let header = Self {
            frame_type,
            params: FrameParams {
                keyframe: frame_type & 1 == 0,
                region: Region {
                    x: x as u32,
                    y: y as u32,
                    width: width as u32,
                    height: height as u32,
                },
                quality,
            },
        };
        Ok((header, payload))
    }

    pub fn is_keyframe(&self) -> bool {
        self.params.keyframe
    }
}
