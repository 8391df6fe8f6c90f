#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod config;
mod consts;
mod regs;
mod utils;

pub use config::*;
pub use consts::*;
pub use regs::*;

use alloc::boxed::Box;
use alloc::vec::Vec;

use axerrno::{AxError, AxResult};
use bitmaps::Bitmap;
use log::{debug, trace, warn};

/// Bitmask of enabled streams, as held by the stream-enable register.
pub type StreamMask = Bitmap<{ SCD_STREAM_MASK_BITS }>;

/// Callback invoked from [`SceneChange::handle_interrupt`] for every stream
/// whose metric reached its threshold. Any context it needs is captured.
pub type SceneChangeCallback<R> = Box<dyn FnMut(&SceneChange<R>)>;

/// One scene change detector core.
///
/// The handler and all setters take `&mut self`: the caller serializes the
/// interrupt handler against itself and against reconfiguration, typically by
/// owning the instance from the interrupt context only or wrapping it in the
/// platform's interrupt-safe lock.
pub struct SceneChange<R: RegisterIo> {
    /// Register access to the core.
    regs: R,
    /// Static configuration of the core.
    config: SceneChangeConfig,
    /// Per-stream configuration, `config.num_streams` entries.
    streams: Vec<StreamConfig>,
    /// Stream that triggered the last detection.
    detected_stream_id: usize,
    /// SAD of the stream that triggered the last detection.
    detected_sad: u32,
    /// Scene change callback.
    callback: Option<SceneChangeCallback<R>>,
}

impl<R: RegisterIo> SceneChange<R> {
    pub fn new(config: SceneChangeConfig, regs: R) -> AxResult<Self> {
        config.validate()?;
        debug!(
            "Scene change device {} ready with {} streams",
            config.device_id, config.num_streams
        );
        Ok(Self {
            regs,
            streams: alloc::vec![StreamConfig::default(); config.num_streams],
            config,
            detected_stream_id: 0,
            detected_sad: 0,
            callback: None,
        })
    }

    pub fn config(&self) -> &SceneChangeConfig {
        &self.config
    }

    pub fn num_streams(&self) -> usize {
        self.config.num_streams
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn stream(&self, stream_id: usize) -> Option<&StreamConfig> {
        self.streams.get(stream_id)
    }

    /// Stream id of the last detected scene change.
    pub fn detected_stream_id(&self) -> usize {
        self.detected_stream_id
    }

    /// SAD of the last detected scene change.
    pub fn detected_sad(&self) -> u32 {
        self.detected_sad
    }

    /// Stores `stream` for `stream_id` and programs its frame registers.
    ///
    /// The stored config is updated before any register is written. The
    /// writes are not atomic: on a failed write the stream's register block
    /// may be partly programmed, and the caller should configure it again.
    ///
    /// A zero height or width is accepted but makes the interrupt handler
    /// panic once the stream is enabled.
    pub fn configure_stream(&mut self, stream_id: usize, stream: StreamConfig) -> AxResult {
        if stream_id >= self.config.num_streams {
            warn!(
                "Scene change device {}: invalid stream id {}",
                self.config.device_id, stream_id
            );
            return Err(AxError::InvalidInput);
        }
        if stream.height == 0 || stream.width == 0 {
            warn!(
                "Scene change stream {} configured with empty frame {}x{}",
                stream_id, stream.width, stream.height
            );
        }

        self.streams[stream_id] = stream;

        let reg = |r| stream_reg(stream_id, r);
        self.regs
            .write_reg(reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_HEIGHT0_DATA), stream.height)?;
        self.regs
            .write_reg(reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_WIDTH0_DATA), stream.width)?;
        self.regs
            .write_reg(reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_STRIDE0_DATA), stream.stride)?;
        self.regs.write_reg(
            reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_VIDEO_FORMAT0_DATA),
            stream.video_format,
        )?;
        self.regs.write_reg(
            reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_SUBSAMPLE0_DATA),
            stream.subsample,
        )?;
        self.regs.write_reg(
            reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_FRM_BUFFER0_DATA),
            stream.buffer_addr as u32,
        )?;
        self.regs.write_reg(
            reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_FRM_BUFFER0_DATA + 4),
            (stream.buffer_addr >> 32) as u32,
        )?;

        Ok(())
    }

    pub fn stream_enable_mask(&self) -> AxResult<StreamMask> {
        let val = self
            .regs
            .read_reg(XV_SCENECHANGE_CTRL_ADDR_HWREG_STREAM_ENABLE_DATA)?;
        Ok(StreamMask::from_value(val))
    }

    pub fn set_stream_enable_mask(&mut self, mask: StreamMask) -> AxResult {
        self.regs.write_reg(
            XV_SCENECHANGE_CTRL_ADDR_HWREG_STREAM_ENABLE_DATA,
            mask.into_value(),
        )
    }

    // --- Core control ---

    pub fn start(&mut self) -> AxResult {
        let ctrl = self.regs.read_reg(XV_SCENECHANGE_CTRL_ADDR_AP_CTRL)?;
        self.regs.write_reg(
            XV_SCENECHANGE_CTRL_ADDR_AP_CTRL,
            (ctrl & XV_SCENECHANGE_AUTO_RESTART) | XV_SCENECHANGE_AP_START,
        )
    }

    pub fn enable_auto_restart(&mut self) -> AxResult {
        self.regs
            .write_reg(XV_SCENECHANGE_CTRL_ADDR_AP_CTRL, XV_SCENECHANGE_AUTO_RESTART)
    }

    pub fn disable_auto_restart(&mut self) -> AxResult {
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_AP_CTRL, 0)
    }

    pub fn is_done(&self) -> AxResult<bool> {
        self.ctrl_bit(XV_SCENECHANGE_AP_DONE)
    }

    pub fn is_idle(&self) -> AxResult<bool> {
        self.ctrl_bit(XV_SCENECHANGE_AP_IDLE)
    }

    pub fn is_ready(&self) -> AxResult<bool> {
        // AP_START stays set until the core has latched its inputs.
        Ok(!self.ctrl_bit(XV_SCENECHANGE_AP_START)?)
    }

    fn ctrl_bit(&self, bit: u32) -> AxResult<bool> {
        Ok(self.regs.read_reg(XV_SCENECHANGE_CTRL_ADDR_AP_CTRL)? & bit != 0)
    }

    // --- Interrupt control ---

    pub fn interrupt_global_enable(&mut self) -> AxResult {
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_GIE, 1)
    }

    pub fn interrupt_global_disable(&mut self) -> AxResult {
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_GIE, 0)
    }

    pub fn interrupt_enable(&mut self, mask: u32) -> AxResult {
        let ier = self.regs.read_reg(XV_SCENECHANGE_CTRL_ADDR_IER)?;
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_IER, ier | mask)
    }

    pub fn interrupt_disable(&mut self, mask: u32) -> AxResult {
        let ier = self.regs.read_reg(XV_SCENECHANGE_CTRL_ADDR_IER)?;
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_IER, ier & !mask)
    }

    pub fn interrupt_status(&self) -> AxResult<u32> {
        self.regs.read_reg(XV_SCENECHANGE_CTRL_ADDR_ISR)
    }

    pub fn clear_interrupt(&mut self, mask: u32) -> AxResult {
        self.regs.write_reg(XV_SCENECHANGE_CTRL_ADDR_ISR, mask)
    }

    // --- Interrupt dispatch ---

    /// Installs the scene change callback, replacing any previous one.
    ///
    /// The callback gets a shared reference to the instance: it can inspect
    /// the detection and access the core through [`SceneChange::registers`],
    /// but cannot reconfigure streams or install another callback from inside
    /// the handler. Such changes are made once `handle_interrupt` returns.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&SceneChange<R>) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Interrupt handler of the core.
    ///
    /// On a done interrupt, reads the SAD of every enabled stream, and for each
    /// stream whose [`sad_per_pixel`] metric reaches its threshold records it as
    /// the detected stream and calls the callback before looking at the next
    /// stream. The done interrupt is cleared afterwards. Other interrupts are
    /// ignored.
    ///
    /// The caller connects this to the platform's interrupt controller and
    /// must not run it concurrently with itself.
    ///
    /// # Panics
    ///
    /// Panics if an enabled stream has a zero height or width.
    pub fn handle_interrupt(&mut self) -> AxResult {
        let status = self.interrupt_status()?;
        if status & XV_SCENECHANGE_CTRL_ADDR_ISR_AP_DONE == 0 {
            trace!("Scene change device {}: ignoring status {status:#x}", self.config.device_id);
            return Ok(());
        }

        let enabled = self.stream_enable_mask()?;
        for stream_id in 0..self.config.num_streams {
            if !enabled.get(stream_id) {
                continue;
            }

            let sad = self.regs.read_reg(stream_reg(
                stream_id,
                XV_SCENECHANGE_CTRL_ADDR_HWREG_SAD0_DATA,
            ))?;
            let stream = &mut self.streams[stream_id];
            stream.sad = sad;
            let metric = stream.metric(sad);
            trace!("Scene change stream {stream_id}: SAD {sad} metric {metric}");

            if metric >= stream.threshold {
                debug!(
                    "Scene change detected on stream {stream_id}: metric {metric} >= {}",
                    stream.threshold
                );
                self.detected_sad = sad;
                self.detected_stream_id = stream_id;
                self.notify();
            }
        }

        self.clear_interrupt(XV_SCENECHANGE_CTRL_ADDR_ISR_AP_DONE)
    }

    fn notify(&mut self) {
        // Taken out for the call so the callback can borrow the whole instance.
        match self.callback.take() {
            Some(mut callback) => {
                callback(self);
                self.callback = Some(callback);
            }
            None => warn!(
                "Scene change device {}: detection on stream {} without callback",
                self.config.device_id, self.detected_stream_id
            ),
        }
    }
}
