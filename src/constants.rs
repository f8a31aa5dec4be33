/// Lower bound of the coder range after normalization.
pub const RAC_BOTTOM: u32 = 0x0100_0000;

// Frequency precision of the binary and multi-symbol models.
pub const MODEL2_SCALE: u32 = 13;
pub const MODEL_SCALE: u32 = 15;

// The byte model buckets its cumulative table by `freq >> MODEL256_SEC_SCALE`.
pub const MODEL256_SEC_SCALE: u32 = 9;
pub const MODEL256_SEC_SIZE: usize = (1 << 6) + 2;

pub const BINARY_MODEL_CEILING: u32 = 0x2000;
pub const MODEL_CEILING: u32 = 0x8000;

pub const MAX_SMALL_SYMBOLS: usize = 16;
pub const BYTE_SYMBOLS: usize = 256;

/// Number of magnitude classes used by `decode_coeff`.
pub const COEFF_CLASSES: usize = 12;

pub const BLOCK_TYPE_COUNT: usize = 5;

// Image block vector quantizer.
pub const VQ_CLASSES: usize = 5;
pub const VQ_CONTEXTS: usize = VQ_CLASSES * VQ_CLASSES * VQ_CLASSES;
pub const MIN_VEC_SIZE: usize = 2;
pub const MAX_VEC_SIZE: usize = 4;

pub const MACROBLOCK_SIZE: usize = 16;
pub const CHROMA_BLOCK_SIZE: usize = 8;
pub const PLANE_COUNT: usize = 3;

pub const DCT_SIZE: usize = 8;
pub const DCT_COEFFS: usize = DCT_SIZE * DCT_SIZE;

/// AC symbol that advances the scan position by 16 without a coefficient.
pub const AC_ZERO_RUN: u8 = 0xF0;
pub const AC_END_OF_BLOCK: u8 = 0;

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

// The size of the packet header preceding the entropy-coded payload.
pub const HEADER_SIZE: usize = 27;
pub const FRAME_TYPE_MASK: u32 = 0x301;
