// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::BTreeMap;

use log::warn;

use crate::build_controls;
use crate::Control;
use crate::ControlTransfer;
use crate::InputTerminalDescriptor;
use crate::ProcessingUnitDescriptor;
use crate::UvcConfig;
use crate::VideoControlDescriptors;

/// A UVC device whose processing unit and input terminal are known, together
/// with the channel used to reach its video control interface.
pub struct Camera<C> {
    processing_unit: ProcessingUnitDescriptor,
    input_terminal: InputTerminalDescriptor,
    properties: BTreeMap<String, String>,
    interface: C,
}

impl<C: ControlTransfer> Camera<C> {
    /// Returns `None` unless `descriptors` holds both a processing unit and an
    /// input terminal.
    pub fn new(
        descriptors: VideoControlDescriptors,
        interface: C,
        properties: BTreeMap<String, String>,
    ) -> Option<Camera<C>> {
        let VideoControlDescriptors {
            processing_unit,
            input_terminal,
        } = descriptors;
        match (processing_unit, input_terminal) {
            (Some(processing_unit), Some(input_terminal)) => Some(Camera {
                processing_unit,
                input_terminal,
                properties,
                interface,
            }),
            (processing_unit, input_terminal) => {
                warn!(
                    "video control chain incomplete: processing unit {}, input terminal {}",
                    processing_unit.is_some(),
                    input_terminal.is_some()
                );
                None
            }
        }
    }

    pub fn processing_unit(&self) -> &ProcessingUnitDescriptor {
        &self.processing_unit
    }

    pub fn input_terminal(&self) -> &InputTerminalDescriptor {
        &self.input_terminal
    }

    pub fn processing_unit_id(&self) -> u8 {
        self.processing_unit.bUnitID
    }

    pub fn input_terminal_id(&self) -> u8 {
        self.input_terminal.bTerminalID
    }

    /// Host reported attributes such as `idVendor` or `product`.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn interface(&self) -> &C {
        &self.interface
    }

    /// Discover the controls of the camera.
    pub fn controls(&self, config: &UvcConfig) -> Vec<Control<'_, C>> {
        let controls = build_controls(self);
        if config.prefetch_limits {
            for control in &controls {
                control.prefetch();
            }
        }
        controls
    }
}
