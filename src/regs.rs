//! Register access backends.

use axaddrspace::{device::AccessWidth, HostVirtAddr};
use axerrno::AxResult;

use crate::utils::{perform_mmio_read, perform_mmio_write, reg_addr};

/// 32-bit register access to one scene change detector instance.
///
/// Offsets are relative to the start of the core's control register block.
pub trait RegisterIo {
    fn read_reg(&self, offset: usize) -> AxResult<u32>;
    fn write_reg(&self, offset: usize, val: u32) -> AxResult;
}

/// Memory-mapped registers of a core.
pub struct MmioRegisters {
    /// The host virtual address the control block is mapped at.
    base: HostVirtAddr,
}

impl MmioRegisters {
    /// Creates a register window at `base`.
    ///
    /// # Safety
    ///
    /// `base` must map the whole control block of a scene change detector
    /// (or any memory valid for volatile 32-bit accesses of that size) for as
    /// long as the returned value is used.
    pub unsafe fn new(base: HostVirtAddr) -> Self {
        Self { base }
    }

    /// Creates a register window from the core's host physical address.
    ///
    /// # Safety
    ///
    /// Same as [`MmioRegisters::new`] for the translated address.
    #[cfg(feature = "axvisor")]
    pub unsafe fn from_phys(addr: axaddrspace::HostPhysAddr) -> Self {
        Self {
            base: axvisor_api::memory::phys_to_virt(addr),
        }
    }

    pub fn base(&self) -> HostVirtAddr {
        self.base
    }
}

impl RegisterIo for MmioRegisters {
    fn read_reg(&self, offset: usize) -> AxResult<u32> {
        perform_mmio_read(reg_addr(self.base, offset), AccessWidth::Dword)
    }

    fn write_reg(&self, offset: usize, val: u32) -> AxResult {
        perform_mmio_write(reg_addr(self.base, offset), AccessWidth::Dword, val)
    }
}
