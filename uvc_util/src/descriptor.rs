// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::mem::size_of;

use zerocopy::FromBytes;

use crate::types::Descriptor;
use crate::types::DescriptorHeader;
use crate::DescriptorType;
use crate::DeviceDescriptor;
use crate::Error;
use crate::InterfaceDescriptor;
use crate::Result;
use crate::CC_VIDEO;
use crate::SC_VIDEOCONTROL;

// Read the descriptor header at `offset`, rejecting descriptors that would not
// advance the walk or that run past the end of `data`.
fn header_at(data: &[u8], offset: usize) -> Result<DescriptorHeader> {
    let remaining = data.get(offset..).ok_or(Error::DescriptorParse)?;
    let (hdr, _) =
        DescriptorHeader::read_from_prefix(remaining).map_err(|_| Error::DescriptorParse)?;
    // Make sure we make forward progress.
    if usize::from(hdr.bLength) < size_of::<DescriptorHeader>() {
        return Err(Error::DescriptorParse);
    }
    if offset + usize::from(hdr.bLength) > data.len() {
        return Err(Error::DescriptorParse);
    }
    Ok(hdr)
}

// Decode the body of a descriptor of type T that starts at `offset`.
fn body_at<T: Descriptor + FromBytes>(
    data: &[u8],
    offset: usize,
    hdr: &DescriptorHeader,
) -> Result<T> {
    if usize::from(hdr.bLength) < size_of::<DescriptorHeader>() + size_of::<T>() {
        return Err(Error::DescriptorParse);
    }
    let start = offset + size_of::<DescriptorHeader>();
    T::read_from_bytes(&data[start..start + size_of::<T>()]).map_err(|_| Error::DescriptorParse)
}

/// Given `data` containing a full set of descriptors as provided by the Linux kernel
/// usbdevfs `descriptors` file, read the device descriptor at its start.
pub fn read_device_descriptor(data: &[u8]) -> Result<DeviceDescriptor> {
    let hdr = header_at(data, 0)?;
    if hdr.bDescriptorType != DeviceDescriptor::descriptor_type() as u8 {
        return Err(Error::DescriptorParse);
    }
    body_at(data, 0, &hdr)
}

/// Given `data` containing a full set of descriptors as provided by the Linux kernel
/// usbdevfs `descriptors` file, locate the class-specific descriptors of the first
/// video control interface. Returns that interface's `bInterfaceNumber` and the
/// bytes starting at its header.
pub fn find_video_control_descriptors(data: &[u8]) -> Result<(u8, &[u8])> {
    let mut offset = 0;
    let mut video_control: Option<u8> = None;
    let mut seen_video_control = false;

    while offset < data.len() {
        let hdr = header_at(data, offset)?;
        match DescriptorType::n(hdr.bDescriptorType) {
            Some(DescriptorType::Interface) => {
                let interface: InterfaceDescriptor = body_at(data, offset, &hdr)?;
                video_control = (interface.bInterfaceClass == CC_VIDEO
                    && interface.bInterfaceSubClass == SC_VIDEOCONTROL)
                    .then_some(interface.bInterfaceNumber);
                seen_video_control |= video_control.is_some();
            }
            Some(DescriptorType::ClassSpecificInterface) => {
                if let Some(interface_number) = video_control {
                    return Ok((interface_number, &data[offset..]));
                }
            }
            // A new configuration starts over; the interface association
            // descriptor precedes the interfaces it groups and ends nothing.
            Some(DescriptorType::Configuration) => video_control = None,
            _ => {}
        }
        offset += usize::from(hdr.bLength);
    }

    if seen_video_control {
        Err(Error::NoSuchDescriptor)
    } else {
        Err(Error::NoVideoControlInterface)
    }
}
