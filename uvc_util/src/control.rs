// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::cell::OnceCell;
use std::fmt;

use crate::transfer::in_request;
use crate::ControlTag;
use crate::ControlTransfer;
use crate::IntegerFormat;
use crate::RequestCode;
use crate::Selector;

/// Semantic shape of a control value. Informational only: the wire encoding is
/// always given by the control's `IntegerFormat`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlType {
    Boolean,
    Bitmap,
    Integer,
    Multibyte,
    /// One of a fixed set of options.
    Menu,
}

/// Unit the control belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlFamily {
    Processing,
    Camera,
}

/// Capabilities reported by GET_INF (UVC 1.5 section 4.1.2, table 4-3).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlInfo(pub u8);

impl ControlInfo {
    const GET: u8 = 1 << 0;
    const SET: u8 = 1 << 1;
    const DISABLED_BY_AUTO: u8 = 1 << 2;
    const AUTOUPDATE: u8 = 1 << 3;
    const ASYNCHRONOUS: u8 = 1 << 4;
    const DISABLED_BY_COMMIT: u8 = 1 << 5;

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn supports_get(&self) -> bool {
        self.0 & Self::GET != 0
    }

    pub fn supports_set(&self) -> bool {
        self.0 & Self::SET != 0
    }

    /// The control is currently disabled because an automatic mode is enabled.
    pub fn disabled_by_auto_mode(&self) -> bool {
        self.0 & Self::DISABLED_BY_AUTO != 0
    }

    /// The device may change the value on its own.
    pub fn autoupdate(&self) -> bool {
        self.0 & Self::AUTOUPDATE != 0
    }

    /// SET_CUR completes through the status interrupt endpoint.
    pub fn asynchronous(&self) -> bool {
        self.0 & Self::ASYNCHRONOUS != 0
    }

    /// The control is disabled by an incompatible video streaming commit state.
    pub fn disabled_by_commit_state(&self) -> bool {
        self.0 & Self::DISABLED_BY_COMMIT != 0
    }
}

impl fmt::Display for ControlInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

// Hardware limits never change during a session, so each is fetched at most once
// successfully. Failed fetches are retried on the next access.
#[derive(Default)]
struct Limits {
    min: OnceCell<i128>,
    max: OnceCell<i128>,
    default: OnceCell<i128>,
    resolution: OnceCell<i128>,
    info: OnceCell<ControlInfo>,
}

fn cached<T: Copy>(cell: &OnceCell<T>, fetch: impl FnOnce() -> Option<T>) -> Option<T> {
    if let Some(value) = cell.get() {
        return Some(*value);
    }
    let value = fetch()?;
    let _ = cell.set(value);
    Some(value)
}

/// An integer valued control of a camera.
///
/// A `Control` borrows the channel of the camera it was built for. The memoized
/// limits are not thread safe; call `prefetch()` before sharing values derived
/// from them across threads.
pub struct Control<'a, C: ?Sized> {
    name: &'static str,
    tag: ControlTag,
    selector: Selector,
    format: IntegerFormat,
    uvctype: ControlType,
    channel: &'a C,
    limits: Limits,
}

impl<'a, C: ControlTransfer + ?Sized> Control<'a, C> {
    pub fn new(
        name: &'static str,
        tag: ControlTag,
        selector: Selector,
        format: IntegerFormat,
        uvctype: ControlType,
        channel: &'a C,
    ) -> Control<'a, C> {
        Control {
            name,
            tag,
            selector,
            format,
            uvctype,
            channel,
            limits: Limits::default(),
        }
    }

    /// Record capabilities already read, for example during discovery, so
    /// `info()` does not ask the device again.
    pub fn with_info(self, info: ControlInfo) -> Control<'a, C> {
        let _ = self.limits.info.set(info);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> ControlTag {
        self.tag
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn format(&self) -> IntegerFormat {
        self.format
    }

    pub fn uvctype(&self) -> ControlType {
        self.uvctype
    }

    pub fn family(&self) -> ControlFamily {
        self.tag.family()
    }

    fn read(&self, request: RequestCode) -> Option<i128> {
        self.format.read(self.channel, request, self.selector)
    }

    /// Current value (GET_CUR), never cached.
    pub fn current(&self) -> Option<i128> {
        self.read(RequestCode::GetCur)
    }

    /// Set the current value (SET_CUR). `value` is clamped to the control's native
    /// range without notice; compare against `min()` and `max()` beforehand if the
    /// exact value matters. Returns true if the device accepted the transfer.
    pub fn set(&self, value: i128) -> bool {
        self.format.write(self.channel, self.selector, value)
    }

    pub fn min(&self) -> Option<i128> {
        cached(&self.limits.min, || self.read(RequestCode::GetMin))
    }

    pub fn max(&self) -> Option<i128> {
        cached(&self.limits.max, || self.read(RequestCode::GetMax))
    }

    pub fn default(&self) -> Option<i128> {
        cached(&self.limits.default, || self.read(RequestCode::GetDef))
    }

    pub fn resolution(&self) -> Option<i128> {
        cached(&self.limits.resolution, || self.read(RequestCode::GetRes))
    }

    /// Capabilities of the control (GET_INF). Always a single byte, whatever the
    /// width of the control.
    pub fn info(&self) -> Option<ControlInfo> {
        cached(&self.limits.info, || {
            IntegerFormat::U8
                .read(self.channel, RequestCode::GetInf, self.selector)
                .map(|bits| ControlInfo(bits as u8))
        })
    }

    /// Size in bytes of the control's value as reported by GET_LEN.
    pub fn length(&self) -> Option<u16> {
        in_request(self.channel, RequestCode::GetLen, self.selector, 2)
            .map(|bytes| IntegerFormat::U16.decode(&bytes) as u16)
    }

    /// Fetch every memoized field now instead of on first access.
    pub fn prefetch(&self) {
        self.min();
        self.max();
        self.default();
        self.resolution();
        self.info();
    }

    /// Snapshot of the control's limits and current value.
    pub fn summary(&self) -> ControlSummary {
        ControlSummary {
            name: self.name,
            family: self.family(),
            index: self.selector.index,
            uvctype: self.uvctype,
            resolution: self.resolution(),
            min: self.min(),
            max: self.max(),
            default: self.default(),
            current: self.current(),
            info: self.info(),
        }
    }
}

/// Find the control with `tag` in a built catalog.
pub fn find_control<'c, 'a, C: ?Sized>(
    controls: &'c [Control<'a, C>],
    tag: ControlTag,
) -> Option<&'c Control<'a, C>> {
    controls.iter().find(|control| control.tag == tag)
}

/// Values of a control at one point in time, printable for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlSummary {
    pub name: &'static str,
    pub family: ControlFamily,
    pub index: u8,
    pub uvctype: ControlType,
    pub resolution: Option<i128>,
    pub min: Option<i128>,
    pub max: Option<i128>,
    pub default: Option<i128>,
    pub current: Option<i128>,
    pub info: Option<ControlInfo>,
}

struct Field(Option<i128>);

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "_"),
        }
    }
}

impl fmt::Display for ControlSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} ({:?}, index {:#04x}, {:?})",
            self.name, self.family, self.index, self.uvctype
        )?;
        writeln!(
            f,
            "resolution: {} min: {} max: {} default: {} current: {}",
            Field(self.resolution),
            Field(self.min),
            Field(self.max),
            Field(self.default),
            Field(self.current)
        )?;
        match self.info {
            Some(info) => write!(f, "info: {}", info),
            None => write!(f, "info: _"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::fake::FakeChannel;
    use crate::ProcessingUnitSelector;

    fn brightness(channel: &FakeChannel) -> Control<'_, FakeChannel> {
        Control::new(
            "Brightness",
            ControlTag::Processing(ProcessingUnitSelector::Brightness),
            Selector::new(0x02, 0x02),
            IntegerFormat::I16,
            ControlType::Integer,
            channel,
        )
    }

    fn scripted() -> FakeChannel {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x02, 0x02);
        channel.respond(RequestCode::GetCur, selector, &[0x10, 0x00]);
        channel.respond(RequestCode::GetMin, selector, &[0xc0, 0xff]);
        channel.respond(RequestCode::GetMax, selector, &[0x40, 0x00]);
        channel.respond(RequestCode::GetDef, selector, &[0x00, 0x00]);
        channel.respond(RequestCode::GetRes, selector, &[0x01, 0x00]);
        channel.respond(RequestCode::GetInf, selector, &[0x03]);
        channel.respond(RequestCode::GetLen, selector, &[0x02, 0x00]);
        channel
    }

    #[test]
    fn limits_are_decoded_signed() {
        let channel = scripted();
        let control = brightness(&channel);

        assert_eq!(control.min(), Some(-64));
        assert_eq!(control.max(), Some(64));
        assert_eq!(control.default(), Some(0));
        assert_eq!(control.resolution(), Some(1));
        assert_eq!(control.current(), Some(16));
        assert_eq!(control.length(), Some(2));
        assert_eq!(control.family(), ControlFamily::Processing);

        let info = control.info().expect("no info");
        assert!(info.supports_get());
        assert!(info.supports_set());
        assert!(!info.autoupdate());
    }

    #[test]
    fn limits_are_fetched_once() {
        let channel = scripted();
        let control = brightness(&channel);

        for _ in 0..3 {
            assert_eq!(control.min(), Some(-64));
            assert_eq!(control.info().map(|i| i.bits()), Some(0x03));
            assert_eq!(control.current(), Some(16));
        }
        assert_eq!(channel.requests(RequestCode::GetMin), 1);
        assert_eq!(channel.requests(RequestCode::GetInf), 1);
        assert_eq!(channel.requests(RequestCode::GetCur), 3);
        // GET_INF is a single byte even for a 16 bit control.
        let log = channel.log.borrow();
        let (setup, _) = log
            .iter()
            .find(|(setup, _)| setup.request == RequestCode::GetInf as u8)
            .expect("no GET_INF");
        assert_eq!(setup.length, 1);
    }

    #[test]
    fn absent_limits_are_retried() {
        let channel = FakeChannel::new();
        let control = brightness(&channel);

        assert_eq!(control.min(), None);
        assert_eq!(control.max(), None);
        assert_eq!(control.default(), None);
        assert_eq!(control.resolution(), None);
        assert_eq!(control.info(), None);
        assert_eq!(control.current(), None);

        channel.respond(RequestCode::GetMin, control.selector(), &[0x80, 0xff]);
        assert_eq!(control.min(), Some(-128));
        assert_eq!(channel.requests(RequestCode::GetMin), 2);
    }

    #[test]
    fn set_clamps() {
        let channel = scripted();
        let control = brightness(&channel);

        assert!(control.set(-100000));
        assert_eq!(control.current(), Some(-32768));
        assert!(control.set(12));
        assert_eq!(control.current(), Some(12));
    }

    #[test]
    fn prefetch_fills_cache() {
        let channel = scripted();
        let control = brightness(&channel);

        control.prefetch();
        let before = channel.log.borrow().len();
        control.min();
        control.max();
        control.default();
        control.resolution();
        control.info();
        assert_eq!(channel.log.borrow().len(), before);
    }

    #[test]
    fn seeded_info_not_fetched() {
        let channel = scripted();
        let control = brightness(&channel).with_info(ControlInfo(0x0f));
        assert_eq!(control.info(), Some(ControlInfo(0x0f)));
        assert_eq!(channel.requests(RequestCode::GetInf), 0);
    }

    #[test]
    fn summary_display() {
        let channel = scripted();
        let summary = brightness(&channel).summary();
        assert_eq!(
            summary.to_string(),
            "Brightness (Processing, index 0x02, Integer)\n\
             resolution: 1 min: -64 max: 64 default: 0 current: 16\n\
             info: 00000011"
        );

        let empty = FakeChannel::new();
        let summary = brightness(&empty).summary();
        assert_eq!(
            summary.to_string(),
            "Brightness (Processing, index 0x02, Integer)\n\
             resolution: _ min: _ max: _ default: _ current: _\n\
             info: _"
        );
    }

    #[test]
    fn find_by_tag() {
        let channel = scripted();
        let controls = vec![brightness(&channel)];
        let brightness = ControlTag::Processing(ProcessingUnitSelector::Brightness);
        let hue = ControlTag::Processing(ProcessingUnitSelector::Hue);
        assert!(find_control(&controls, brightness).is_some());
        assert!(find_control(&controls, hue).is_none());
    }
}
