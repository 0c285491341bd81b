// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Control transfer timeout applied by the usbdevfs adapter, in milliseconds.
pub const DEFAULT_TRANSFER_TIMEOUT_MS: u32 = 5000;

/// Host side settings of the engine. Every field is optional in serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UvcConfig {
    pub transfer_timeout_ms: u32,
    /// Directory listing USB devices, one entry per device and interface.
    pub sysfs_root: PathBuf,
    /// Directory holding the usbdevfs nodes, `BBB/DDD` below it.
    pub devfs_root: PathBuf,
    /// Fetch the limits and capabilities of every control when the catalog is
    /// built instead of on first access.
    pub prefetch_limits: bool,
    /// Unbind the kernel driver (uvcvideo) from the video control interface
    /// when claiming it. Without this, opening a camera that has a driver
    /// bound fails.
    pub detach_kernel_driver: bool,
}

impl Default for UvcConfig {
    fn default() -> Self {
        UvcConfig {
            transfer_timeout_ms: DEFAULT_TRANSFER_TIMEOUT_MS,
            sysfs_root: PathBuf::from("/sys/bus/usb/devices"),
            devfs_root: PathBuf::from("/dev/bus/usb"),
            prefetch_limits: false,
            detach_kernel_driver: false,
        }
    }
}

impl UvcConfig {
    pub fn from_json(json: &str) -> Result<UvcConfig> {
        serde_json::from_str(json).map_err(Error::ConfigParse)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.transfer_timeout_ms.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(UvcConfig::from_json("{}").unwrap(), UvcConfig::default());
    }

    #[test]
    fn partial() {
        let config =
            UvcConfig::from_json(r#"{"prefetch_limits": true, "devfs_root": "/tmp/usb"}"#)
                .unwrap();
        assert!(config.prefetch_limits);
        assert!(!config.detach_kernel_driver);
        assert_eq!(config.devfs_root, PathBuf::from("/tmp/usb"));
        assert_eq!(config.sysfs_root, PathBuf::from("/sys/bus/usb/devices"));
        assert_eq!(config.transfer_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_field_rejected() {
        match UvcConfig::from_json(r#"{"timeout": 10}"#) {
            Err(Error::ConfigParse(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn serialize_round_trip() {
        let config = UvcConfig {
            transfer_timeout_ms: 250,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(UvcConfig::from_json(&json).unwrap(), config);
    }
}
