// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! UVC request codes, control addressing and the wire constants of USB Video
//! Class 1.5.

use crate::control_request_type;
use crate::ControlRequestDataPhaseTransferDirection;
use crate::ControlRequestRecipient;
use crate::ControlRequestType;
use crate::UsbRequestSetup;
use crate::DATA_PHASE_DIRECTION;

/// Video interface class code (CC_VIDEO).
pub const CC_VIDEO: u8 = 0x0e;
/// Video control interface subclass (SC_VIDEOCONTROL).
pub const SC_VIDEOCONTROL: u8 = 0x01;
/// Class-specific interface descriptor type (CS_INTERFACE).
pub const CS_INTERFACE: u8 = 0x24;

/// Video control interface descriptor subtypes.
pub const VC_HEADER: u8 = 0x01;
pub const VC_INPUT_TERMINAL: u8 = 0x02;
pub const VC_PROCESSING_UNIT: u8 = 0x05;

/// wTerminalType of a camera sensor input terminal.
pub const ITT_CAMERA: u16 = 0x0201;

// Device class triple announcing an Interface Association Descriptor, as
// listed in the USB Interface Association Descriptor ECN. UVC devices use it.
pub const IAD_DEVICE_CLASS: u8 = 0xef;
pub const IAD_DEVICE_SUBCLASS: u8 = 0x02;
pub const IAD_DEVICE_PROTOCOL: u8 = 0x01;

/// Returns true if the device class triple is the one UVC devices report.
pub fn is_iad_device(class: u8, subclass: u8, protocol: u8) -> bool {
    class == IAD_DEVICE_CLASS && subclass == IAD_DEVICE_SUBCLASS && protocol == IAD_DEVICE_PROTOCOL
}

/// UVC class-specific request codes (UVC 1.5 section 4.2).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, enumn::N)]
#[repr(u8)]
pub enum RequestCode {
    SetCur = 0x01,
    GetCur = 0x81,
    GetMin = 0x82,
    GetMax = 0x83,
    GetRes = 0x84,
    GetLen = 0x85,
    GetInf = 0x86,
    GetDef = 0x87,
}

impl RequestCode {
    /// Data stage direction implied by the request code. GET requests carry the
    /// direction bit in the code itself.
    pub fn direction(self) -> ControlRequestDataPhaseTransferDirection {
        if (self as u8) & DATA_PHASE_DIRECTION == 0 {
            ControlRequestDataPhaseTransferDirection::HostToDevice
        } else {
            ControlRequestDataPhaseTransferDirection::DeviceToHost
        }
    }

    /// bmRequestType for this request addressed to a video control interface.
    pub fn request_type(self) -> u8 {
        control_request_type(
            ControlRequestType::Class,
            self.direction(),
            ControlRequestRecipient::Interface,
        )
    }
}

/// Address of a single control: the control selector and the id of the unit or
/// terminal it belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector {
    pub index: u8,
    pub target: u8,
}

impl Selector {
    pub fn new(index: u8, target: u8) -> Selector {
        Selector { index, target }
    }

    /// wValue of a request for this control. The selector occupies the high byte.
    pub fn w_value(&self) -> u16 {
        u16::from(self.index) << 8
    }

    /// wIndex of a request for this control. The entity id occupies the high byte
    /// and the low byte is left 0.
    pub fn w_index(&self) -> u16 {
        u16::from(self.target) << 8
    }

    /// Build the setup packet of `request` for this control with a data stage of
    /// `length` bytes.
    pub fn setup(&self, request: RequestCode, length: u16) -> UsbRequestSetup {
        UsbRequestSetup::new(
            request.request_type(),
            request as u8,
            self.w_value(),
            self.w_index(),
            length,
        )
    }
}
