// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Locating UVC devices through sysfs and opening them through usbdevfs.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::info;
use log::warn;

use crate::find_video_control_descriptors;
use crate::is_iad_device;
use crate::parse_video_control_descriptors;
use crate::Camera;
use crate::Error;
use crate::Result;
use crate::UsbdevfsInterface;
use crate::UvcConfig;

/// sysfs attributes copied into the properties of a camera when present.
pub const PROPERTY_NAMES: &[&str] = &[
    "idVendor",
    "idProduct",
    "manufacturer",
    "product",
    "serial",
    "busnum",
    "devnum",
    "speed",
    "version",
];

/// A USB device announcing the UVC device class triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub sysfs_path: PathBuf,
    pub devnode: PathBuf,
    pub properties: BTreeMap<String, String>,
}

// Read a sysfs attribute, `None` if the device does not expose it.
fn read_attribute(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::SysfsRead(path, e)),
    }
}

fn read_hex_attribute(dir: &Path, name: &str) -> Result<Option<u8>> {
    Ok(read_attribute(dir, name)?.and_then(|v| u8::from_str_radix(&v, 16).ok()))
}

/// Read the string attributes in `PROPERTY_NAMES` that the device at `path`
/// exposes.
pub fn read_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut properties = BTreeMap::new();
    for name in PROPERTY_NAMES {
        if let Some(value) = read_attribute(path, name)? {
            properties.insert(name.to_string(), value);
        }
    }
    Ok(properties)
}

fn devnode(config: &UvcConfig, properties: &BTreeMap<String, String>) -> Option<PathBuf> {
    let busnum: u16 = properties.get("busnum")?.parse().ok()?;
    let devnum: u16 = properties.get("devnum")?.parse().ok()?;
    Some(
        config
            .devfs_root
            .join(format!("{:03}", busnum))
            .join(format!("{:03}", devnum)),
    )
}

/// List the devices under `config.sysfs_root` whose class triple is the UVC
/// one, sorted by sysfs name.
pub fn enumerate_candidates(config: &UvcConfig) -> Result<Vec<Candidate>> {
    let root = &config.sysfs_root;
    let mut paths = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| Error::SysfsRead(root.clone(), e))? {
        let entry = entry.map_err(|e| Error::SysfsRead(root.clone(), e))?;
        // Interfaces are listed next to devices as `<device>:<config>.<interface>`.
        if entry.file_name().to_string_lossy().contains(':') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    let mut candidates = Vec::new();
    for path in paths {
        let class = read_hex_attribute(&path, "bDeviceClass")?;
        let subclass = read_hex_attribute(&path, "bDeviceSubClass")?;
        let protocol = read_hex_attribute(&path, "bDeviceProtocol")?;
        match (class, subclass, protocol) {
            (Some(c), Some(s), Some(p)) if is_iad_device(c, s, p) => {}
            _ => continue,
        }
        let properties = read_properties(&path)?;
        match devnode(config, &properties) {
            Some(devnode) => candidates.push(Candidate {
                sysfs_path: path,
                devnode,
                properties,
            }),
            None => warn!("{} has no usable bus address", path.display()),
        }
    }
    debug!("{} UVC candidates under {}", candidates.len(), root.display());
    Ok(candidates)
}

/// Open `candidate`, claim its video control interface and build a camera from
/// the interface's descriptors. The interface stays claimed until the camera
/// is dropped.
pub fn open_camera(
    candidate: &Candidate,
    config: &UvcConfig,
) -> Result<Camera<UsbdevfsInterface>> {
    let mut interface = UsbdevfsInterface::open(&candidate.devnode, config.transfer_timeout_ms)?;
    let (interface_number, chain) = find_video_control_descriptors(interface.descriptors())?;
    let descriptors = parse_video_control_descriptors(chain);
    if !descriptors.is_complete() {
        return Err(Error::IncompleteDescriptors);
    }
    interface.claim_interface(interface_number, config.detach_kernel_driver)?;
    Camera::new(descriptors, interface, candidate.properties.clone())
        .ok_or(Error::IncompleteDescriptors)
}

/// Open every UVC device on the host. Devices that cannot be opened are
/// logged and skipped.
pub fn enumerate_cameras(config: &UvcConfig) -> Result<Vec<Camera<UsbdevfsInterface>>> {
    let mut cameras = Vec::new();
    for candidate in enumerate_candidates(config)? {
        match open_camera(&candidate, config) {
            Ok(camera) => {
                info!(
                    "opened camera {} (processing unit {}, input terminal {})",
                    candidate.devnode.display(),
                    camera.processing_unit_id(),
                    camera.input_terminal_id()
                );
                cameras.push(camera);
            }
            Err(e) => warn!("skipping {}: {}", candidate.devnode.display(), e),
        }
    }
    Ok(cameras)
}
