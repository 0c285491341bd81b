// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io;
use std::num;
use std::path::PathBuf;

use remain::sorted;
use thiserror::Error;

#[sorted]
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse configuration: {0}")]
    ConfigParse(serde_json::Error),
    #[error("parsing descriptors failed")]
    DescriptorParse,
    #[error("reading descriptors from device failed: {0}")]
    DescriptorRead(io::Error),
    #[error("video control descriptors lack a processing unit or an input terminal")]
    IncompleteDescriptors,
    #[error("invalid buffer length: {0}")]
    InvalidBufferLength(num::TryFromIntError),
    #[error("USB ioctl 0x{0:x} failed: {1}")]
    IoctlFailed(libc::c_ulong, io::Error),
    #[error("Requested descriptor not found")]
    NoSuchDescriptor,
    #[error("device has no video control interface")]
    NoVideoControlInterface,
    #[error("failed to open device node {0}: {1}")]
    OpenDevice(PathBuf, io::Error),
    #[error("failed to read sysfs attribute {0}: {1}")]
    SysfsRead(PathBuf, io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
