// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Control transfers through a Linux usbdevfs device node.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::mem::size_of;
use std::os::raw::c_uint;
use std::os::raw::c_ulong;
use std::os::raw::c_void;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use libc::EINTR;
use libc::ENODEV;
use libc::EPIPE;
use libc::ETIMEDOUT;
use log::debug;
use log::warn;

use crate::ControlTransfer;
use crate::Error;
use crate::Result;
use crate::TransferCompletion;
use crate::TransferStatus;
use crate::UsbRequestSetup;

pub type IoctlNr = c_ulong;

// Generic Linux ioctl number layout (asm-generic/ioctl.h).
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;
const IOC_WRITE: IoctlNr = 1;
const IOC_READ: IoctlNr = 2;

const fn ioctl_iowr_nr(ty: u8, nr: u8, size: usize) -> IoctlNr {
    ((IOC_READ | IOC_WRITE) << IOC_DIRSHIFT)
        | ((ty as IoctlNr) << IOC_TYPESHIFT)
        | ((nr as IoctlNr) << IOC_NRSHIFT)
        | ((size as IoctlNr) << IOC_SIZESHIFT)
}

const fn ioctl_ior_nr(ty: u8, nr: u8, size: usize) -> IoctlNr {
    (IOC_READ << IOC_DIRSHIFT)
        | ((ty as IoctlNr) << IOC_TYPESHIFT)
        | ((nr as IoctlNr) << IOC_NRSHIFT)
        | ((size as IoctlNr) << IOC_SIZESHIFT)
}

/// Argument of USBDEVFS_CONTROL, as laid out in linux/usbdevice_fs.h.
#[allow(non_camel_case_types, non_snake_case)]
#[repr(C)]
struct usbdevfs_ctrltransfer {
    bRequestType: u8,
    bRequest: u8,
    wValue: u16,
    wIndex: u16,
    wLength: u16,
    timeout: u32,
    data: *mut c_void,
}

const USBDEVFS_MAXDRIVERNAME: usize = 255;

#[allow(non_camel_case_types)]
#[repr(C)]
struct usbdevfs_disconnect_claim {
    interface: c_uint,
    flags: c_uint,
    driver: [u8; USBDEVFS_MAXDRIVERNAME + 1],
}

pub const USBDEVFS_CONTROL: IoctlNr =
    ioctl_iowr_nr(b'U', 0, size_of::<usbdevfs_ctrltransfer>());
pub const USBDEVFS_CLAIMINTERFACE: IoctlNr = ioctl_ior_nr(b'U', 15, size_of::<c_uint>());
pub const USBDEVFS_RELEASEINTERFACE: IoctlNr = ioctl_ior_nr(b'U', 16, size_of::<c_uint>());
pub const USBDEVFS_DISCONNECT_CLAIM: IoctlNr =
    ioctl_ior_nr(b'U', 27, size_of::<usbdevfs_disconnect_claim>());

/// An opened usbdevfs node (`/dev/bus/usb/BBB/DDD`) performing synchronous
/// control transfers on the default pipe.
///
/// Class requests addressed to an interface are only accepted by the kernel
/// once that interface is claimed; see `claim_interface()`. A claimed
/// interface is released when the node is dropped.
pub struct UsbdevfsInterface {
    fd: File,
    descriptors: Vec<u8>,
    timeout_ms: u32,
    claimed: Option<u8>,
}

impl UsbdevfsInterface {
    /// Open the node at `path` and read its descriptor blob.
    pub fn open<P: AsRef<Path>>(path: P, timeout_ms: u32) -> Result<UsbdevfsInterface> {
        let path = path.as_ref();
        let fd = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::OpenDevice(path.to_path_buf(), e))?;
        UsbdevfsInterface::new(fd, timeout_ms)
    }

    /// Wrap an already opened usbdevfs file. Reading starts at the current
    /// position, which must be the start of the file.
    pub fn new(mut fd: File, timeout_ms: u32) -> Result<UsbdevfsInterface> {
        let mut descriptors = Vec::new();
        fd.read_to_end(&mut descriptors).map_err(Error::DescriptorRead)?;
        Ok(UsbdevfsInterface {
            fd,
            descriptors,
            timeout_ms,
            claimed: None,
        })
    }

    // Issue `nr` with a pointer to `arg`, retrying on EINTR.
    //
    // Safe only when `T` is the argument type the kernel expects for `nr`.
    unsafe fn ioctl_with_ref<T>(&self, nr: IoctlNr, arg: &T) -> Result<i32> {
        loop {
            let ret = libc::ioctl(self.fd.as_raw_fd(), nr as _, arg as *const T);
            if ret >= 0 {
                return Ok(ret);
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(EINTR) {
                return Err(Error::IoctlFailed(nr, err));
            }
        }
    }

    /// Claim `interface_number` for this file. With `detach_kernel_driver`
    /// any bound driver, usually uvcvideo, is unbound first; otherwise the
    /// claim fails with EBUSY while a driver holds the interface.
    pub fn claim_interface(
        &mut self,
        interface_number: u8,
        detach_kernel_driver: bool,
    ) -> Result<()> {
        if detach_kernel_driver {
            let disconnect_claim = usbdevfs_disconnect_claim {
                interface: interface_number.into(),
                flags: 0,
                driver: [0u8; USBDEVFS_MAXDRIVERNAME + 1],
            };
            // SAFETY:
            // Safe because self.fd is a valid usbdevfs file descriptor and we pass a valid
            // pointer to a usbdevfs_disconnect_claim structure.
            unsafe {
                self.ioctl_with_ref(USBDEVFS_DISCONNECT_CLAIM, &disconnect_claim)?;
            }
        } else {
            let ifnum: c_uint = interface_number.into();
            // SAFETY:
            // Safe because self.fd is a valid usbdevfs file descriptor and we pass a valid
            // pointer to unsigned int.
            unsafe {
                self.ioctl_with_ref(USBDEVFS_CLAIMINTERFACE, &ifnum)?;
            }
        }
        debug!("claimed interface {}", interface_number);
        self.claimed = Some(interface_number);
        Ok(())
    }

    /// Release the interface claimed with `claim_interface()`, if any.
    pub fn release_interface(&mut self) -> Result<()> {
        if let Some(interface_number) = self.claimed.take() {
            let ifnum: c_uint = interface_number.into();
            // SAFETY:
            // Safe because self.fd is a valid usbdevfs file descriptor and we pass a valid
            // pointer to unsigned int.
            unsafe {
                self.ioctl_with_ref(USBDEVFS_RELEASEINTERFACE, &ifnum)?;
            }
        }
        Ok(())
    }

    /// The interface currently claimed through this file.
    pub fn claimed_interface(&self) -> Option<u8> {
        self.claimed
    }

    /// Device and configuration descriptors as reported by the kernel.
    pub fn descriptors(&self) -> &[u8] {
        &self.descriptors
    }

    /// Issue USBDEVFS_CONTROL and return the number of bytes moved in the data
    /// stage.
    pub fn control(&self, setup: &UsbRequestSetup, buffer: &mut [u8]) -> Result<usize> {
        let length = u16::try_from(buffer.len()).map_err(Error::InvalidBufferLength)?;
        let ctrl_transfer = usbdevfs_ctrltransfer {
            bRequestType: setup.request_type,
            bRequest: setup.request,
            wValue: setup.value,
            wIndex: setup.index,
            wLength: length.min(setup.length),
            timeout: self.timeout_ms,
            data: buffer.as_mut_ptr() as *mut c_void,
        };
        // SAFETY:
        // Safe because self.fd is a valid usbdevfs file descriptor, ctrl_transfer
        // outlives the call and its data pointer covers wLength bytes of buffer.
        let ret = unsafe { self.ioctl_with_ref(USBDEVFS_CONTROL, &ctrl_transfer)? };
        Ok(ret as usize)
    }
}

impl Drop for UsbdevfsInterface {
    fn drop(&mut self) {
        if let Err(e) = self.release_interface() {
            warn!("failed to release interface: {}", e);
        }
    }
}

fn errno_status(err: &io::Error) -> TransferStatus {
    match err.raw_os_error() {
        Some(EPIPE) => TransferStatus::Stalled,
        Some(ENODEV) => TransferStatus::NoDevice,
        Some(ETIMEDOUT) => TransferStatus::TimedOut,
        _ => TransferStatus::Error,
    }
}

impl ControlTransfer for UsbdevfsInterface {
    fn control_transfer(&self, setup: &UsbRequestSetup, buffer: &mut [u8]) -> TransferCompletion {
        match self.control(setup, buffer) {
            Ok(n) => TransferCompletion::completed(n),
            Err(Error::IoctlFailed(_, err)) => TransferCompletion::failed(errno_status(&err)),
            Err(e) => {
                debug!("control transfer not issued: {}", e);
                TransferCompletion::failed(TransferStatus::Error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Seek;
    use std::io::Write;

    use super::*;

    #[test]
    #[cfg(all(target_pointer_width = "64", any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn control_ioctl_number() {
        assert_eq!(size_of::<usbdevfs_ctrltransfer>(), 24);
        assert_eq!(USBDEVFS_CONTROL, 0xc018_5500);
    }

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    fn claim_ioctl_numbers() {
        assert_eq!(size_of::<usbdevfs_disconnect_claim>(), 264);
        assert_eq!(USBDEVFS_CLAIMINTERFACE, 0x8004_550f);
        assert_eq!(USBDEVFS_RELEASEINTERFACE, 0x8004_5510);
        assert_eq!(USBDEVFS_DISCONNECT_CLAIM, 0x8108_551b);
    }

    #[test]
    fn claim_on_regular_file_fails() {
        for detach in [false, true] {
            let file = tempfile::tempfile().unwrap();
            let mut interface = UsbdevfsInterface::new(file, 1000).unwrap();
            let expected = if detach {
                USBDEVFS_DISCONNECT_CLAIM
            } else {
                USBDEVFS_CLAIMINTERFACE
            };
            match interface.claim_interface(0, detach) {
                Err(Error::IoctlFailed(nr, err)) => {
                    assert_eq!(nr, expected);
                    assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));
                }
                other => panic!("unexpected result {:?}", other),
            }
            assert_eq!(interface.claimed_interface(), None);
            // Nothing claimed, so nothing to release.
            interface.release_interface().unwrap();
        }
    }

    #[test]
    fn errno_mapping() {
        let status = |errno| errno_status(&io::Error::from_raw_os_error(errno));
        assert_eq!(status(EPIPE), TransferStatus::Stalled);
        assert_eq!(status(ENODEV), TransferStatus::NoDevice);
        assert_eq!(status(ETIMEDOUT), TransferStatus::TimedOut);
        assert_eq!(status(libc::EIO), TransferStatus::Error);
    }

    #[test]
    fn descriptors_read_on_open() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&[0x12, 0x01, 0x00, 0x02]).unwrap();
        file.rewind().unwrap();

        let interface = UsbdevfsInterface::new(file, 1000).unwrap();
        assert_eq!(interface.descriptors(), &[0x12, 0x01, 0x00, 0x02]);
    }

    #[test]
    fn regular_file_is_not_a_device() {
        let file = tempfile::tempfile().unwrap();
        let interface = UsbdevfsInterface::new(file, 1000).unwrap();
        let setup = UsbRequestSetup::new(0xa1, 0x86, 0x0200, 0x0200, 1);
        let mut buffer = [0u8; 1];
        // ENOTTY from the ioctl becomes a generic error with nothing transferred.
        assert_eq!(
            interface.control_transfer(&setup, &mut buffer),
            TransferCompletion::failed(TransferStatus::Error)
        );
    }

    #[test]
    fn missing_node() {
        let dir = tempfile::tempdir().unwrap();
        match UsbdevfsInterface::open(dir.path().join("001"), 1000) {
            Err(Error::OpenDevice(path, _)) => assert_eq!(path, dir.path().join("001")),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("opened a missing node"),
        }
    }
}
