use axerrno::{AxError, AxResult};
use log::warn;

use crate::consts::SCD_MAX_STREAMS;

/// Static configuration of one scene change detector instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneChangeConfig {
    /// Unique id of the device.
    pub device_id: u16,
    /// Number of streams the core was synthesized with.
    pub num_streams: usize,
}

impl SceneChangeConfig {
    pub fn new(device_id: u16, num_streams: usize) -> Self {
        Self {
            device_id,
            num_streams,
        }
    }

    pub(crate) fn validate(&self) -> AxResult {
        if self.num_streams == 0 || self.num_streams > SCD_MAX_STREAMS {
            warn!(
                "Scene change device {}: {} streams outside [1, {}]",
                self.device_id, self.num_streams, SCD_MAX_STREAMS
            );
            return Err(AxError::InvalidInput);
        }
        Ok(())
    }
}

/// Per-stream settings, plus the last SAD read back from the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamConfig {
    /// Frame height in lines.
    pub height: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Line stride of the frame buffer in bytes.
    pub stride: u32,
    /// Video format code as understood by the core.
    pub video_format: u32,
    /// Subsample factor: the core compares one line out of `subsample`.
    pub subsample: u32,
    /// Detection threshold on the per-pixel SAD.
    pub threshold: u32,
    /// Frame buffer address (memory based variant of the core).
    pub buffer_addr: u64,
    /// SAD read from the core for this stream on the last done interrupt.
    pub sad: u32,
}

impl StreamConfig {
    /// A stream of `height` lines by `width` pixels with the given subsample factor
    /// and threshold. Stride, format and buffer address are left zero.
    pub fn new(height: u32, width: u32, subsample: u32, threshold: u32) -> Self {
        Self {
            height,
            width,
            subsample,
            threshold,
            ..Default::default()
        }
    }

    /// Normalized SAD metric of this stream for `sad`.
    pub fn metric(&self, sad: u32) -> u32 {
        sad_per_pixel(sad, self.subsample, self.height, self.width)
    }
}

/// `(sad * subsample) / (height * width)` in wrapping 32-bit arithmetic with
/// truncating division, as the core's driver contract defines it.
///
/// # Panics
///
/// Panics if `height * width` is zero (mod 2^32). There is no fallback value
/// for an unconfigured frame size.
pub fn sad_per_pixel(sad: u32, subsample: u32, height: u32, width: u32) -> u32 {
    sad.wrapping_mul(subsample) / height.wrapping_mul(width)
}
