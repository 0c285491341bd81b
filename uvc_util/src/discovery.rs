// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::ops::RangeInclusive;

use log::debug;

use crate::transfer::in_request;
use crate::ControlInfo;
use crate::ControlTransfer;
use crate::RequestCode;
use crate::Selector;

/// Selector indices probed on a processing unit.
pub const PROCESSING_UNIT_SELECTORS: RangeInclusive<u8> = 0x01..=0x13;
/// Selector indices probed on a camera terminal.
pub const CAMERA_TERMINAL_SELECTORS: RangeInclusive<u8> = 0x01..=0x14;

/// Probe every selector index in `indices` on entity `target` with a one byte
/// GET_INF and return the indices that answered, in ascending order, each with
/// the capabilities it reported.
pub fn discover_controls<C: ControlTransfer + ?Sized>(
    channel: &C,
    target: u8,
    indices: RangeInclusive<u8>,
) -> Vec<(u8, ControlInfo)> {
    let found: Vec<(u8, ControlInfo)> = indices
        .filter_map(|index| {
            let info = in_request(channel, RequestCode::GetInf, Selector::new(index, target), 1)?;
            Some((index, ControlInfo(info[0])))
        })
        .collect();
    debug!(
        "entity {} answers selectors {:02x?}",
        target,
        found.iter().map(|(index, _)| index).collect::<Vec<_>>()
    );
    found
}
