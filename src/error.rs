use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mss3Error {
    // Stream errors, fatal to the current frame only
    #[error("Range decoder ran out of input")]
    TruncatedInput = 1,
    #[error("Malformed block data")]
    MalformedBlock = 2,
    #[error("Frame header too short")]
    InvalidHeader = 3,
    #[error("Invalid frame type")]
    InvalidFrameType = 4,
    #[error("Keyframe required before inter frames")]
    KeyframeRequired = 5,

    // Argument errors, rejected before any payload byte is consumed
    #[error("Invalid decode region")]
    InvalidRegion = 100,
    #[error("Invalid quality setting")]
    InvalidQuality = 101,
    #[error("Invalid frame dimensions")]
    InvalidDimensions = 102,
}
