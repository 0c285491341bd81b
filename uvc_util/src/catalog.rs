// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Static tables naming the controls of the processing unit and the camera
//! terminal, and the construction of typed controls from discovered selectors.

use crate::discover_controls;
use crate::Camera;
use crate::Control;
use crate::ControlFamily;
use crate::ControlInfo;
use crate::ControlTransfer;
use crate::ControlType;
use crate::IntegerFormat;
use crate::Selector;
use crate::CAMERA_TERMINAL_SELECTORS;
use crate::PROCESSING_UNIT_SELECTORS;

/// Processing unit control selectors (UVC 1.5 table A-13).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, enumn::N)]
#[repr(u8)]
pub enum ProcessingUnitSelector {
    BacklightCompensation = 0x01,
    Brightness = 0x02,
    Contrast = 0x03,
    Gain = 0x04,
    PowerLineFrequency = 0x05,
    Hue = 0x06,
    Saturation = 0x07,
    Sharpness = 0x08,
    Gamma = 0x09,
    WhiteBalanceTemperature = 0x0a,
    WhiteBalanceTemperatureAuto = 0x0b,
    WhiteBalanceComponent = 0x0c,
    WhiteBalanceComponentAuto = 0x0d,
    DigitalMultiplier = 0x0e,
    DigitalMultiplierLimit = 0x0f,
    HueAuto = 0x10,
    AnalogVideoStandard = 0x11,
    AnalogLockStatus = 0x12,
    ContrastAuto = 0x13,
}

/// Camera terminal control selectors (UVC 1.5 table A-12).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, enumn::N)]
#[repr(u8)]
pub enum CameraTerminalSelector {
    ScanningMode = 0x01,
    AutoExposureMode = 0x02,
    AutoExposurePriority = 0x03,
    ExposureTimeAbsolute = 0x04,
    ExposureTimeRelative = 0x05,
    FocusAbsolute = 0x06,
    FocusRelative = 0x07,
    FocusAuto = 0x08,
    IrisAbsolute = 0x09,
    IrisRelative = 0x0a,
    ZoomAbsolute = 0x0b,
    ZoomRelative = 0x0c,
    PanTiltAbsolute = 0x0d,
    PanTiltRelative = 0x0e,
    RollAbsolute = 0x0f,
    RollRelative = 0x10,
    Privacy = 0x11,
    FocusSimple = 0x12,
    DigitalWindow = 0x13,
    RegionOfInterest = 0x14,
}

/// Identity of a control independent of the camera it lives on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlTag {
    Processing(ProcessingUnitSelector),
    Camera(CameraTerminalSelector),
}

impl ControlTag {
    pub fn family(self) -> ControlFamily {
        match self {
            ControlTag::Processing(_) => ControlFamily::Processing,
            ControlTag::Camera(_) => ControlFamily::Camera,
        }
    }

    /// Selector index of the control.
    pub fn index(self) -> u8 {
        match self {
            ControlTag::Processing(s) => s as u8,
            ControlTag::Camera(s) => s as u8,
        }
    }

    /// Look up the tag for selector `index` of a unit of `family`.
    pub fn from_index(family: ControlFamily, index: u8) -> Option<ControlTag> {
        match family {
            ControlFamily::Processing => {
                ProcessingUnitSelector::n(index).map(ControlTag::Processing)
            }
            ControlFamily::Camera => CameraTerminalSelector::n(index).map(ControlTag::Camera),
        }
    }
}

/// Name and wire layout of a cataloged control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub format: IntegerFormat,
    pub uvctype: ControlType,
}

const fn entry(name: &'static str, format: IntegerFormat, uvctype: ControlType) -> CatalogEntry {
    CatalogEntry {
        name,
        format,
        uvctype,
    }
}

/// Catalog entry for `tag`, or `None` for controls whose layout does not fit
/// in a 64 bit integer.
pub fn catalog_entry(tag: ControlTag) -> Option<CatalogEntry> {
    use ControlType::*;
    use IntegerFormat as F;

    let e = match tag {
        ControlTag::Processing(s) => {
            use ProcessingUnitSelector::*;
            match s {
                BacklightCompensation => entry("Backlight Compensation", F::U16, Integer),
                Brightness => entry("Brightness", F::I16, Integer),
                Contrast => entry("Contrast", F::U16, Integer),
                Gain => entry("Gain", F::U16, Integer),
                PowerLineFrequency => entry("Power Line Frequency", F::U8, Menu),
                Hue => entry("Hue", F::I16, Integer),
                Saturation => entry("Saturation", F::U16, Integer),
                Sharpness => entry("Sharpness", F::U16, Integer),
                Gamma => entry("Gamma", F::U16, Integer),
                WhiteBalanceTemperature => entry("White Balance Temperature", F::U16, Integer),
                WhiteBalanceTemperatureAuto => {
                    entry("White Balance Temperature, Auto", F::U8, Boolean)
                }
                WhiteBalanceComponent => entry("White Balance Component", F::U32, Multibyte),
                WhiteBalanceComponentAuto => {
                    entry("White Balance Component, Auto", F::U8, Boolean)
                }
                DigitalMultiplier => entry("Digital Multiplier", F::U16, Integer),
                DigitalMultiplierLimit => entry("Digital Multiplier Limit", F::U16, Integer),
                HueAuto => entry("Hue, Auto", F::U8, Boolean),
                AnalogVideoStandard => entry("Analog Video Standard", F::U8, Integer),
                AnalogLockStatus => entry("Analog Video Lock Status", F::U8, Integer),
                ContrastAuto => entry("Contrast, Auto", F::U8, Boolean),
            }
        }
        ControlTag::Camera(s) => {
            use CameraTerminalSelector::*;
            match s {
                ScanningMode => entry("Scanning Mode", F::U8, Menu),
                AutoExposureMode => entry("Auto-Exposure Mode", F::U8, Bitmap),
                AutoExposurePriority => entry("Auto-Exposure Priority", F::U8, Boolean),
                ExposureTimeAbsolute => entry("Exposure Time (Absolute)", F::U32, Integer),
                ExposureTimeRelative => entry("Exposure Time (Relative)", F::I8, Integer),
                FocusAbsolute => entry("Focus (Absolute)", F::U16, Integer),
                FocusRelative => entry("Focus (Relative)", F::U16, Multibyte),
                FocusAuto => entry("Focus, Auto", F::U8, Boolean),
                IrisAbsolute => entry("Iris (Absolute)", F::U16, Integer),
                IrisRelative => entry("Iris (Relative)", F::U8, Integer),
                ZoomAbsolute => entry("Zoom (Absolute)", F::U16, Integer),
                PanTiltAbsolute => entry("PanTilt (Absolute)", F::U64, Multibyte),
                PanTiltRelative => entry("PanTilt (Relative)", F::U32, Multibyte),
                RollAbsolute => entry("Roll (Absolute)", F::I16, Integer),
                RollRelative => entry("Roll (Relative)", F::U16, Multibyte),
                Privacy => entry("Privacy", F::U8, Boolean),
                FocusSimple => entry("Focus, Simple Range", F::U8, Menu),
                // Three byte layout.
                ZoomRelative => return None,
                DigitalWindow | RegionOfInterest => return None,
            }
        }
    };
    Some(e)
}

// Turn the indices an entity answered into controls, dropping unknown ones.
fn cataloged<'a, C: ControlTransfer + ?Sized>(
    channel: &'a C,
    family: ControlFamily,
    target: u8,
    found: Vec<(u8, ControlInfo)>,
) -> impl Iterator<Item = Control<'a, C>> {
    found.into_iter().filter_map(move |(index, info)| {
        let tag = ControlTag::from_index(family, index)?;
        let e = catalog_entry(tag)?;
        let control = Control::new(
            e.name,
            tag,
            Selector::new(index, target),
            e.format,
            e.uvctype,
            channel,
        );
        Some(control.with_info(info))
    })
}

/// Discover and build every cataloged control of `camera`: processing unit
/// controls first, then camera terminal controls, each in selector order.
pub fn build_controls<C: ControlTransfer>(camera: &Camera<C>) -> Vec<Control<'_, C>> {
    let channel = camera.interface();
    let pu = camera.processing_unit_id();
    let it = camera.input_terminal_id();

    let pu_found = discover_controls(channel, pu, PROCESSING_UNIT_SELECTORS);
    let it_found = discover_controls(channel, it, CAMERA_TERMINAL_SELECTORS);

    cataloged(channel, ControlFamily::Processing, pu, pu_found)
        .chain(cataloged(channel, ControlFamily::Camera, it, it_found))
        .collect()
}
