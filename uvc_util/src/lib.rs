// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! USB Video Class control protocol: descriptor walking, control discovery and
//! typed access to the processing unit and camera terminal controls of a
//! webcam.

mod camera;
mod catalog;
mod config;
mod control;
mod descriptor;
mod discovery;
mod error;
#[cfg(any(target_os = "android", target_os = "linux"))]
mod host;
mod integer;
mod request;
mod transfer;
mod types;
#[cfg(any(target_os = "android", target_os = "linux"))]
mod usbdevfs;
mod video_control;

pub use self::camera::Camera;
pub use self::catalog::{
    build_controls, catalog_entry, CameraTerminalSelector, CatalogEntry, ControlTag,
    ProcessingUnitSelector,
};
pub use self::config::{UvcConfig, DEFAULT_TRANSFER_TIMEOUT_MS};
pub use self::control::{
    find_control, Control, ControlFamily, ControlInfo, ControlSummary, ControlType,
};
pub use self::descriptor::{find_video_control_descriptors, read_device_descriptor};
pub use self::discovery::{
    discover_controls, CAMERA_TERMINAL_SELECTORS, PROCESSING_UNIT_SELECTORS,
};
pub use self::error::{Error, Result};
#[cfg(any(target_os = "android", target_os = "linux"))]
pub use self::host::{
    enumerate_cameras, enumerate_candidates, open_camera, read_properties, Candidate,
    PROPERTY_NAMES,
};
pub use self::integer::{IntegerFormat, IntegerWidth};
pub use self::request::{
    is_iad_device, RequestCode, Selector, CC_VIDEO, CS_INTERFACE, IAD_DEVICE_CLASS,
    IAD_DEVICE_PROTOCOL, IAD_DEVICE_SUBCLASS, ITT_CAMERA, SC_VIDEOCONTROL, VC_HEADER,
    VC_INPUT_TERMINAL, VC_PROCESSING_UNIT,
};
pub use self::transfer::{in_request, out_request, ControlTransfer, TransferCompletion};
pub use self::types::{
    control_request_type, ControlRequestDataPhaseTransferDirection, ControlRequestRecipient,
    ControlRequestType, DescriptorHeader, DescriptorType, DeviceDescriptor, InterfaceDescriptor,
    TransferStatus, UsbRequestSetup, DATA_PHASE_DIRECTION,
};
#[cfg(any(target_os = "android", target_os = "linux"))]
pub use self::usbdevfs::{
    IoctlNr, UsbdevfsInterface, USBDEVFS_CLAIMINTERFACE, USBDEVFS_CONTROL,
    USBDEVFS_DISCONNECT_CLAIM, USBDEVFS_RELEASEINTERFACE,
};
pub use self::video_control::{
    parse_video_control_descriptors, CameraTerminal, CameraTerminalDescriptor, DescriptorPrefix,
    InputTerminal, InputTerminalDescriptor, ProcessingUnit, ProcessingUnitDescriptor, VcHeader,
    VideoControlDescriptors,
};
