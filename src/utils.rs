use axaddrspace::{device::AccessWidth, HostVirtAddr};
use axerrno::{AxError, AxResult};
use log::warn;

/// Address of the register at `offset` in the block mapped at `base`.
pub(crate) fn reg_addr(base: HostVirtAddr, offset: usize) -> HostVirtAddr {
    assert!(offset % 4 == 0, "Unaligned register offset {offset:#x}");
    HostVirtAddr::from_usize(base.as_usize() + offset)
}

// The control interface is AXI4-Lite: only 32-bit accesses reach the core.

pub(crate) fn perform_mmio_read(addr: HostVirtAddr, width: AccessWidth) -> AxResult<u32> {
    let addr = addr.as_ptr();

    match width {
        AccessWidth::Dword => Ok(unsafe { (addr as *const u32).read_volatile() }),
        _ => {
            warn!("Unsupported {width:?} read of scene change register");
            Err(AxError::Unsupported)
        }
    }
}

pub(crate) fn perform_mmio_write(addr: HostVirtAddr, width: AccessWidth, val: u32) -> AxResult {
    let addr = addr.as_mut_ptr();

    match width {
        AccessWidth::Dword => {
            unsafe { (addr as *mut u32).write_volatile(val) };
            Ok(())
        }
        _ => {
            warn!("Unsupported {width:?} write of scene change register");
            Err(AxError::Unsupported)
        }
    }
}
