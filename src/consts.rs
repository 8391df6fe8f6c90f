// Register map of the scene change detector control interface (AXI4-Lite).

/// Maximum number of streams the core can be synthesized with.
pub const SCD_MAX_STREAMS: usize = 8;

/// Width of the stream-enable register, one bit per stream.
pub const SCD_STREAM_MASK_BITS: usize = 32;

// --- Global registers ---

/// Offset of the control register (start, done, idle, ready, auto restart).
pub const XV_SCENECHANGE_CTRL_ADDR_AP_CTRL: usize = 0x000;

/// Offset of the global interrupt enable register.
pub const XV_SCENECHANGE_CTRL_ADDR_GIE: usize = 0x004;

/// Offset of the interrupt enable register.
pub const XV_SCENECHANGE_CTRL_ADDR_IER: usize = 0x008;

/// Offset of the interrupt status register. Writing a set bit toggles it.
pub const XV_SCENECHANGE_CTRL_ADDR_ISR: usize = 0x00c;

/// Offset of the stream-enable bitmask register.
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_STREAM_ENABLE_DATA: usize = 0x010;

// --- Per-stream registers ---

/// Stride between two streams' register blocks.
/// Register R of stream S is at: S * SCD_LAYER_OFFSET + R
pub const XV_SCD_LAYER_OFFSET: usize = 0x100;

pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_HEIGHT0_DATA: usize = 0x100;
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_WIDTH0_DATA: usize = 0x108;
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_STRIDE0_DATA: usize = 0x110;
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_VIDEO_FORMAT0_DATA: usize = 0x118;
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_SUBSAMPLE0_DATA: usize = 0x120;

/// Sum of absolute differences computed for the last frame of stream 0.
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_SAD0_DATA: usize = 0x128;

/// Frame buffer address of stream 0, low word then high word.
pub const XV_SCENECHANGE_CTRL_ADDR_HWREG_FRM_BUFFER0_DATA: usize = 0x138;

// --- AP_CTRL bits ---

pub const XV_SCENECHANGE_AP_START: u32 = 1 << 0;
pub const XV_SCENECHANGE_AP_DONE: u32 = 1 << 1;
pub const XV_SCENECHANGE_AP_IDLE: u32 = 1 << 2;
pub const XV_SCENECHANGE_AP_READY: u32 = 1 << 3;
pub const XV_SCENECHANGE_AUTO_RESTART: u32 = 1 << 7;

// --- IER / ISR bits ---

/// Interrupt raised when the core finished a processing pass.
pub const XV_SCENECHANGE_CTRL_ADDR_ISR_AP_DONE: u32 = 1 << 0;
pub const XV_SCENECHANGE_CTRL_ADDR_ISR_AP_READY: u32 = 1 << 1;

/// Offset of register `reg` (given for stream 0) in the block of `stream_id`.
pub const fn stream_reg(stream_id: usize, reg: usize) -> usize {
    stream_id * XV_SCD_LAYER_OFFSET + reg
}
