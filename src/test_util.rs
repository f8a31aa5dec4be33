//! Encoder side of the range coder and models, used to build exact streams
//! for tests.

use crate::block::BlockType;
use crate::constants::{
    BLOCK_TYPE_COUNT, COEFF_CLASSES, DCT_COEFFS, MAX_VEC_SIZE, MIN_VEC_SIZE, MODEL_SCALE,
    PLANE_COUNT, RAC_BOTTOM, VQ_CLASSES, VQ_CONTEXTS,
};
use crate::model::{BinaryModel, ByteModel, SmallModel};

/// LZMA style range encoder with delayed carry propagation. Its output is
/// exactly what [`crate::range_coder::RangeDecoder`] consumes.
pub(crate) struct RangeEncoder {
    low: u64,
    range: u32,
    cache: u8,
    cache_size: u64,
    out: Vec<u8>,
}

impl RangeEncoder {
    pub(crate) fn new() -> Self {
        Self {
            low: 0,
            range: 0xFFFF_FFFF,
            cache: 0,
            cache_size: 1,
            out: Vec::new(),
        }
    }

    fn shift_low(&mut self) {
        if (self.low as u32) < 0xFF00_0000 || (self.low >> 32) != 0 {
            let carry = (self.low >> 32) as u8;
            let mut byte = self.cache;
            while self.cache_size > 0 {
                self.out.push(byte.wrapping_add(carry));
                byte = 0xFF;
                self.cache_size -= 1;
            }
            self.cache = (self.low >> 24) as u8;
        }
        self.cache_size += 1;
        self.low = (self.low & 0x00FF_FFFF) << 8;
    }

    fn encode(&mut self, lo: u32, hi: u32) {
        self.low += lo as u64;
        self.range = hi - lo;
        while self.range < RAC_BOTTOM {
            self.range <<= 8;
            self.shift_low();
        }
    }

    pub(crate) fn put_bit(&mut self, bit: bool) {
        let half = self.range >> 1;
        if bit {
            self.encode(half, half * 2);
        } else {
            self.encode(0, half);
        }
    }

    pub(crate) fn put_bits(&mut self, value: u32, nbits: u32) {
        let step = self.range >> nbits;
        self.encode(step * value, step * value + step);
    }

    pub(crate) fn put_binary(&mut self, model: &mut BinaryModel, bit: bool) {
        let full = self.range;
        let helper = model.split(full);
        if bit {
            self.encode(helper, full);
        } else {
            self.encode(0, helper);
        }
        model.update(bit);
    }

    pub(crate) fn put_small(&mut self, model: &mut SmallModel, sym: usize) {
        let full = self.range;
        let (lo, hi) = model.bounds(sym, full, full >> MODEL_SCALE);
        self.encode(lo, hi);
        model.update(sym);
    }

    pub(crate) fn put_byte(&mut self, model: &mut ByteModel, sym: u8) {
        let full = self.range;
        let (lo, hi) = model.bounds(sym as usize, full, full >> MODEL_SCALE);
        self.encode(lo, hi);
        model.update(sym as usize);
    }

    pub(crate) fn put_coeff(&mut self, model: &mut SmallModel, value: i32) {
        if value == 0 {
            self.put_small(model, 0);
            return;
        }
        let magnitude = value.unsigned_abs();
        let class = 32 - magnitude.leading_zeros();
        self.put_small(model, class as usize);
        self.put_bit(value < 0);
        if class > 1 {
            self.put_bits(magnitude - (1 << (class - 1)), class - 1);
        }
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        for _ in 0..5 {
            self.shift_low();
        }
        // The leading cache byte never carries payload
        debug_assert_eq!(self.out[0], 0);
        self.out.split_off(1)
    }
}

/// Palette block content. `classes` is in raster order; `literals` holds one
/// sample per escaped pixel, in raster order.
pub(crate) struct ImageBlock {
    pub(crate) palette: Vec<u8>,
    pub(crate) classes: Vec<usize>,
    pub(crate) literals: Vec<u8>,
}

/// One 8x8 DCT sub-block: DC delta and `(zero run, level)` pairs in zigzag
/// order. An end-of-block marker is written when the scan stops short of 64.
#[derive(Clone, Default)]
pub(crate) struct DctBlock {
    pub(crate) dc_delta: i32,
    pub(crate) ac: Vec<(usize, i32)>,
}

pub(crate) enum Block {
    Fill(i32),
    Image(ImageBlock),
    Dct(Vec<DctBlock>),
    /// Raster coefficients; the low-pass quadrant holds bytes.
    Haar(Vec<i32>),
    Skip,
}

/// Mirror of every model one plane decoder holds.
struct PlaneModels {
    block_types: [SmallModel; BLOCK_TYPE_COUNT],
    last_type: BlockType,
    fill: SmallModel,
    vec_size: SmallModel,
    vec_entry: ByteModel,
    vq: Vec<SmallModel>,
    escape: ByteModel,
    dc: SmallModel,
    sign: BinaryModel,
    ac: ByteModel,
    haar_lo: ByteModel,
    haar_hi: SmallModel,
}

impl PlaneModels {
    fn new() -> Self {
        Self {
            block_types: std::array::from_fn(|_| SmallModel::new(BLOCK_TYPE_COUNT)),
            last_type: BlockType::Skip,
            fill: SmallModel::new(COEFF_CLASSES),
            vec_size: SmallModel::new(MAX_VEC_SIZE - MIN_VEC_SIZE + 1),
            vec_entry: ByteModel::new(),
            vq: (0..VQ_CONTEXTS).map(|_| SmallModel::new(VQ_CLASSES)).collect(),
            escape: ByteModel::new(),
            dc: SmallModel::new(COEFF_CLASSES),
            sign: BinaryModel::new(),
            ac: ByteModel::new(),
            haar_lo: ByteModel::new(),
            haar_hi: SmallModel::new(COEFF_CLASSES),
        }
    }

    fn block_type(&mut self, enc: &mut RangeEncoder, block_type: BlockType) {
        enc.put_small(&mut self.block_types[self.last_type as usize], block_type as usize);
        self.last_type = block_type;
    }

    fn image(&mut self, enc: &mut RangeEncoder, block: &ImageBlock, size: usize) {
        enc.put_small(&mut self.vec_size, block.palette.len() - MIN_VEC_SIZE);
        for &entry in &block.palette {
            enc.put_byte(&mut self.vec_entry, entry);
        }

        let mut literals = block.literals.iter();
        for y in 0..size {
            for x in 0..size {
                let class_at = |cx: usize, cy: usize| block.classes[cy * size + cx];
                let left = if x > 0 { class_at(x - 1, y) } else { 0 };
                let above = if y > 0 { class_at(x, y - 1) } else { 0 };
                let above_left = if x > 0 && y > 0 { class_at(x - 1, y - 1) } else { 0 };
                let ctx = left + above * VQ_CLASSES + above_left * VQ_CLASSES * VQ_CLASSES;

                let class = class_at(x, y);
                enc.put_small(&mut self.vq[ctx], class);
                if class >= block.palette.len() {
                    let literal = *literals.next().expect("missing literal");
                    enc.put_byte(&mut self.escape, literal);
                }
            }
        }
    }

    fn dct(&mut self, enc: &mut RangeEncoder, block: &DctBlock) {
        enc.put_coeff(&mut self.dc, block.dc_delta);

        let mut pos = 1;
        for &(run, level) in &block.ac {
            let mut run = run;
            while run >= 16 {
                enc.put_byte(&mut self.ac, 0xF0);
                run -= 16;
                pos += 16;
            }
            let magnitude = level.unsigned_abs();
            let class = 32 - magnitude.leading_zeros();
            assert!(class >= 1 && class < 16);
            enc.put_byte(&mut self.ac, ((run << 4) as u32 | class) as u8);
            enc.put_binary(&mut self.sign, level < 0);
            if class > 1 {
                enc.put_bits(magnitude - (1 << (class - 1)), class - 1);
            }
            pos += run + 1;
        }
        assert!(pos <= DCT_COEFFS);
        if pos < DCT_COEFFS {
            enc.put_byte(&mut self.ac, 0);
        }
    }

    fn haar(&mut self, enc: &mut RangeEncoder, coeffs: &[i32], size: usize) {
        let hsize = size / 2;
        for y in 0..size {
            for x in 0..size {
                let c = coeffs[y * size + x];
                if x < hsize && y < hsize {
                    enc.put_byte(&mut self.haar_lo, c as u8);
                } else {
                    enc.put_coeff(&mut self.haar_hi, c);
                }
            }
        }
    }

    fn block(&mut self, enc: &mut RangeEncoder, block: &Block, size: usize) {
        match block {
            Block::Fill(delta) => {
                self.block_type(enc, BlockType::Fill);
                enc.put_coeff(&mut self.fill, *delta);
            }
            Block::Image(image) => {
                self.block_type(enc, BlockType::Image);
                self.image(enc, image, size);
            }
            Block::Dct(sub_blocks) => {
                self.block_type(enc, BlockType::Dct);
                for sub in sub_blocks {
                    self.dct(enc, sub);
                }
            }
            Block::Haar(coeffs) => {
                self.block_type(enc, BlockType::Haar);
                self.haar(enc, coeffs, size);
            }
            Block::Skip => self.block_type(enc, BlockType::Skip),
        }
    }
}

/// Writes the payload of individual blocks of one plane, without block types.
pub(crate) struct PlaneWriter {
    enc: RangeEncoder,
    models: PlaneModels,
}

impl PlaneWriter {
    pub(crate) fn new() -> Self {
        Self {
            enc: RangeEncoder::new(),
            models: PlaneModels::new(),
        }
    }

    pub(crate) fn image(&mut self, block: &ImageBlock, size: usize) {
        self.models.image(&mut self.enc, block, size);
    }

    pub(crate) fn dct(&mut self, block: &DctBlock) {
        self.models.dct(&mut self.enc, block);
    }

    pub(crate) fn haar(&mut self, coeffs: &[i32], size: usize) {
        self.models.haar(&mut self.enc, coeffs, size);
    }

    pub(crate) fn encoder(&mut self) -> &mut RangeEncoder {
        &mut self.enc
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.enc.finish()
    }
}

/// Writes a frame payload: macroblocks in raster order, each carrying one
/// typed block per plane.
pub(crate) struct FrameWriter {
    enc: RangeEncoder,
    planes: [PlaneModels; PLANE_COUNT],
}

impl FrameWriter {
    pub(crate) fn new() -> Self {
        Self {
            enc: RangeEncoder::new(),
            planes: std::array::from_fn(|_| PlaneModels::new()),
        }
    }

    pub(crate) fn macroblock(&mut self, blocks: [&Block; PLANE_COUNT]) {
        for (plane, (models, block)) in self.planes.iter_mut().zip(blocks).enumerate() {
            let size = if plane == 0 { 16 } else { 8 };
            models.block(&mut self.enc, block, size);
        }
    }

    /// Mirrors the decoder's keyframe reset.
    pub(crate) fn reset_models(&mut self) {
        self.planes = std::array::from_fn(|_| PlaneModels::new());
    }

    /// Closes the current payload. Model state carries over to the next one.
    pub(crate) fn finish_frame(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.enc, RangeEncoder::new()).finish()
    }
}

/// 27 byte frame header followed by `payload`.
pub(crate) fn packet(
    keyframe: bool,
    region: (u16, u16, u16, u16),
    quality: u8,
    payload: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(27 + payload.len());
    let frame_type: u32 = if keyframe { 0x300 } else { 0x301 };
    out.extend_from_slice(&frame_type.to_be_bytes());
    out.extend_from_slice(&[0; 6]);
    for v in [region.0, region.1, region.2, region.3] {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out.extend_from_slice(&[0; 4]);
    out.push(quality);
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(payload);
    out
}
