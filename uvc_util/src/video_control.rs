// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Walker for the class-specific video control descriptor chain (UVC 1.5
//! section 3.7.2), which follows the standard video control interface
//! descriptor and holds one descriptor per unit or terminal.

#![allow(non_snake_case)]

use std::mem::size_of;
use std::ops::Deref;

use log::warn;
use static_assertions::const_assert;
use zerocopy::little_endian::U16;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;
use zerocopy::Unaligned;

use crate::ITT_CAMERA;
use crate::VC_INPUT_TERMINAL;
use crate::VC_PROCESSING_UNIT;

/// Fields shared by every class-specific descriptor.
#[derive(Copy, Clone, Debug, Default, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DescriptorPrefix {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDescriptorSubType: u8,
}

/// Fixed part of the class-specific video control interface header.
#[derive(Copy, Clone, Debug, Default, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned)]
#[repr(C)]
pub struct VcHeader {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDescriptorSubType: u8,
    pub bcdUVC: U16,
    /// Size of the whole chain, this header included.
    pub wTotalLength: U16,
}

/// Fixed part of a processing unit descriptor, up to and including bControlSize.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct ProcessingUnit {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDescriptorSubType: u8,
    pub bUnitID: u8,
    pub bSourceID: u8,
    pub wMaxMultiplier: U16,
    pub bControlSize: u8,
}

/// Fixed part of an input terminal descriptor shared by every terminal type.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct InputTerminal {
    pub bLength: u8,
    pub bDescriptorType: u8,
    pub bDescriptorSubType: u8,
    pub bTerminalID: u8,
    pub wTerminalType: U16,
}

/// Camera terminal fields following bAssocTerminal and iTerminal.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct CameraTerminal {
    pub wObjectiveFocalLengthMin: U16,
    pub wObjectiveFocalLengthMax: U16,
    pub wOcularFocalLength: U16,
    pub bControlSize: u8,
}

const_assert!(size_of::<DescriptorPrefix>() == 3);
const_assert!(size_of::<VcHeader>() == 7);
const_assert!(size_of::<ProcessingUnit>() == 8);
const_assert!(size_of::<InputTerminal>() == 6);
const_assert!(size_of::<CameraTerminal>() == 7);

// Offset of the camera terminal fields within an input terminal descriptor.
const CAMERA_TERMINAL_OFFSET: usize = 8;

/// A decoded processing unit descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingUnitDescriptor {
    inner: ProcessingUnit,
    // bmControls, truncated to what the descriptor actually holds.
    controls: Vec<u8>,
}

impl ProcessingUnitDescriptor {
    /// Decode `desc`, which must span exactly one descriptor (`bLength` bytes).
    pub fn parse(desc: &[u8]) -> Option<ProcessingUnitDescriptor> {
        let (inner, rest) = ProcessingUnit::read_from_prefix(desc).ok()?;
        let controls = rest
            .get(..usize::from(inner.bControlSize))
            .unwrap_or(rest)
            .to_vec();
        Some(ProcessingUnitDescriptor { inner, controls })
    }

    /// bmControls as advertised by the device. Devices are known to under-report
    /// here, so discovery does not rely on it.
    pub fn controls(&self) -> &[u8] {
        &self.controls
    }
}

impl Deref for ProcessingUnitDescriptor {
    type Target = ProcessingUnit;

    fn deref(&self) -> &ProcessingUnit {
        &self.inner
    }
}

/// Camera specific part of an input terminal descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraTerminalDescriptor {
    inner: CameraTerminal,
    controls: Vec<u8>,
}

impl CameraTerminalDescriptor {
    pub fn controls(&self) -> &[u8] {
        &self.controls
    }
}

impl Deref for CameraTerminalDescriptor {
    type Target = CameraTerminal;

    fn deref(&self) -> &CameraTerminal {
        &self.inner
    }
}

/// A decoded input terminal descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputTerminalDescriptor {
    inner: InputTerminal,
    assoc_terminal: Option<u8>,
    string_index: Option<u8>,
    camera: Option<CameraTerminalDescriptor>,
}

impl InputTerminalDescriptor {
    /// Decode `desc`, which must span exactly one descriptor (`bLength` bytes).
    /// Trailing fields the descriptor is too short to hold are left empty.
    pub fn parse(desc: &[u8]) -> Option<InputTerminalDescriptor> {
        let (inner, rest) = InputTerminal::read_from_prefix(desc).ok()?;
        let camera = if inner.wTerminalType.get() == ITT_CAMERA {
            desc.get(CAMERA_TERMINAL_OFFSET..)
                .and_then(|bytes| CameraTerminal::read_from_prefix(bytes).ok())
                .map(|(inner, rest)| CameraTerminalDescriptor {
                    inner,
                    controls: rest
                        .get(..usize::from(inner.bControlSize))
                        .unwrap_or(rest)
                        .to_vec(),
                })
        } else {
            None
        };
        Some(InputTerminalDescriptor {
            inner,
            assoc_terminal: rest.first().copied(),
            string_index: rest.get(1).copied(),
            camera,
        })
    }

    /// bAssocTerminal, if the descriptor is long enough to carry it.
    pub fn assoc_terminal(&self) -> Option<u8> {
        self.assoc_terminal
    }

    /// iTerminal, if the descriptor is long enough to carry it.
    pub fn string_index(&self) -> Option<u8> {
        self.string_index
    }

    /// Camera terminal fields, present when wTerminalType is ITT_CAMERA.
    pub fn camera(&self) -> Option<&CameraTerminalDescriptor> {
        self.camera.as_ref()
    }
}

impl Deref for InputTerminalDescriptor {
    type Target = InputTerminal;

    fn deref(&self) -> &InputTerminal {
        &self.inner
    }
}

/// The unit and terminal descriptors needed to address controls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoControlDescriptors {
    pub processing_unit: Option<ProcessingUnitDescriptor>,
    pub input_terminal: Option<InputTerminalDescriptor>,
}

impl VideoControlDescriptors {
    pub fn is_complete(&self) -> bool {
        self.processing_unit.is_some() && self.input_terminal.is_some()
    }
}

/// Walk the class-specific video control chain in `data`, which starts with the
/// video control header, and capture its processing unit and input terminal.
///
/// A corrupt chain is not an error: the walk stops at the first descriptor that
/// cannot be trusted and whatever was captured up to that point is returned.
pub fn parse_video_control_descriptors(data: &[u8]) -> VideoControlDescriptors {
    let mut descriptors = VideoControlDescriptors::default();

    let header = match VcHeader::read_from_prefix(data) {
        Ok((header, _)) => header,
        Err(_) => {
            warn!("video control header truncated ({} bytes)", data.len());
            return descriptors;
        }
    };
    let total_length = usize::from(header.wTotalLength.get());
    if total_length < size_of::<VcHeader>() || usize::from(header.bLength) < size_of::<VcHeader>()
    {
        warn!(
            "invalid video control header: bLength {} wTotalLength {}",
            header.bLength, total_length
        );
        return descriptors;
    }
    let end = if total_length > data.len() {
        warn!(
            "video control wTotalLength {} exceeds the {} bytes available",
            total_length,
            data.len()
        );
        data.len()
    } else {
        total_length
    };

    let mut offset = usize::from(header.bLength);
    while offset < end {
        let chain = &data[offset..end];
        let prefix = match DescriptorPrefix::read_from_prefix(chain) {
            Ok((prefix, _)) => prefix,
            Err(_) => {
                warn!("truncated descriptor at offset {}", offset);
                break;
            }
        };

        // Make sure we make forward progress.
        let length = usize::from(prefix.bLength);
        if length == 0 {
            warn!("zero-length descriptor at offset {}", offset);
            break;
        }
        let desc = match chain.get(..length) {
            Some(desc) => desc,
            None => {
                warn!(
                    "descriptor at offset {} overruns the chain ({} > {})",
                    offset,
                    length,
                    chain.len()
                );
                break;
            }
        };

        match prefix.bDescriptorSubType {
            VC_PROCESSING_UNIT => match ProcessingUnitDescriptor::parse(desc) {
                Some(pud) => descriptors.processing_unit = Some(pud),
                None => warn!("processing unit descriptor too short: {} bytes", length),
            },
            VC_INPUT_TERMINAL => match InputTerminalDescriptor::parse(desc) {
                Some(itd) => descriptors.input_terminal = Some(itd),
                None => warn!("input terminal descriptor too short: {} bytes", length),
            },
            _ => {}
        }

        offset += length;
    }

    descriptors
}
