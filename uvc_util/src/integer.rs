// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Width and sign aware encoding of integer control values.
//!
//! Every control value is exposed as an `i128`, which holds all values of the
//! signed and unsigned 8, 16, 32 and 64 bit layouts a control may use on the
//! wire. Values travel little endian, as all USB multi-byte fields do.

use crate::transfer::in_request;
use crate::transfer::out_request;
use crate::ControlTransfer;
use crate::RequestCode;
use crate::Selector;
use crate::TransferStatus;

/// Native width of an integer control.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntegerWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntegerWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntegerWidth::W8 => 8,
            IntegerWidth::W16 => 16,
            IntegerWidth::W32 => 32,
            IntegerWidth::W64 => 64,
        }
    }

    pub fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }
}

/// Wire layout of an integer control: its width and signedness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntegerFormat {
    pub width: IntegerWidth,
    pub signed: bool,
}

impl IntegerFormat {
    pub const U8: IntegerFormat = IntegerFormat::unsigned(IntegerWidth::W8);
    pub const I8: IntegerFormat = IntegerFormat::signed(IntegerWidth::W8);
    pub const U16: IntegerFormat = IntegerFormat::unsigned(IntegerWidth::W16);
    pub const I16: IntegerFormat = IntegerFormat::signed(IntegerWidth::W16);
    pub const U32: IntegerFormat = IntegerFormat::unsigned(IntegerWidth::W32);
    pub const I32: IntegerFormat = IntegerFormat::signed(IntegerWidth::W32);
    pub const U64: IntegerFormat = IntegerFormat::unsigned(IntegerWidth::W64);
    pub const I64: IntegerFormat = IntegerFormat::signed(IntegerWidth::W64);

    pub const fn signed(width: IntegerWidth) -> IntegerFormat {
        IntegerFormat {
            width,
            signed: true,
        }
    }

    pub const fn unsigned(width: IntegerWidth) -> IntegerFormat {
        IntegerFormat {
            width,
            signed: false,
        }
    }

    /// Size of the value on the wire in bytes.
    pub fn size(self) -> usize {
        self.width.bytes()
    }

    /// Smallest representable value.
    pub fn min_value(self) -> i128 {
        if self.signed {
            -(1i128 << (self.width.bits() - 1))
        } else {
            0
        }
    }

    /// Largest representable value.
    pub fn max_value(self) -> i128 {
        if self.signed {
            (1i128 << (self.width.bits() - 1)) - 1
        } else {
            (1i128 << self.width.bits()) - 1
        }
    }

    /// Pin `value` to the representable range. Out-of-range values saturate at
    /// the nearest bound; they never wrap.
    pub fn clamp(self, value: i128) -> i128 {
        value.clamp(self.min_value(), self.max_value())
    }

    /// Clamp `value` and serialize it in the native layout.
    pub fn encode(self, value: i128) -> Vec<u8> {
        // Two's complement truncation is exact once the value is in range.
        self.clamp(value).to_le_bytes()[..self.size()].to_vec()
    }

    /// Decode a value in the native layout. Missing high bytes of a short
    /// transfer read as zero; bytes past the native width are ignored.
    pub fn decode(self, bytes: &[u8]) -> i128 {
        let mut raw = [0u8; 16];
        let n = bytes.len().min(self.size());
        raw[..n].copy_from_slice(&bytes[..n]);
        let value = u128::from_le_bytes(raw);
        if self.signed {
            let shift = 128 - self.width.bits();
            ((value << shift) as i128) >> shift
        } else {
            value as i128
        }
    }

    /// Issue `request` for `selector` and decode the reply. `None` when the
    /// device returned no data.
    pub fn read<C: ControlTransfer + ?Sized>(
        self,
        channel: &C,
        request: RequestCode,
        selector: Selector,
    ) -> Option<i128> {
        // Native sizes are at most eight bytes.
        let length = u16::try_from(self.size()).ok()?;
        in_request(channel, request, selector, length).map(|bytes| self.decode(&bytes))
    }

    /// Clamp `value` and send it with SET_CUR. Returns true if the transfer
    /// completed; clamping is not reported.
    pub fn write<C: ControlTransfer + ?Sized>(
        self,
        channel: &C,
        selector: Selector,
        value: i128,
    ) -> bool {
        let completion = out_request(channel, RequestCode::SetCur, selector, &self.encode(value));
        completion.status == TransferStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::fake::FakeChannel;

    const ALL_FORMATS: [IntegerFormat; 8] = [
        IntegerFormat::U8,
        IntegerFormat::I8,
        IntegerFormat::U16,
        IntegerFormat::I16,
        IntegerFormat::U32,
        IntegerFormat::I32,
        IntegerFormat::U64,
        IntegerFormat::I64,
    ];

    #[test]
    fn bounds_match_native_types() {
        assert_eq!(IntegerFormat::U8.max_value(), u8::MAX as i128);
        assert_eq!(IntegerFormat::I8.min_value(), i8::MIN as i128);
        assert_eq!(IntegerFormat::I16.max_value(), i16::MAX as i128);
        assert_eq!(IntegerFormat::U32.max_value(), u32::MAX as i128);
        assert_eq!(IntegerFormat::I32.min_value(), i32::MIN as i128);
        assert_eq!(IntegerFormat::U64.max_value(), u64::MAX as i128);
        assert_eq!(IntegerFormat::I64.min_value(), i64::MIN as i128);
        assert_eq!(IntegerFormat::I64.max_value(), i64::MAX as i128);
    }

    #[test]
    fn clamp_pins_to_bounds() {
        for format in ALL_FORMATS {
            let (min, max) = (format.min_value(), format.max_value());
            assert_eq!(format.clamp(min - 1), min, "{:?}", format);
            assert_eq!(format.clamp(i128::MIN), min, "{:?}", format);
            assert_eq!(format.clamp(max + 1), max, "{:?}", format);
            assert_eq!(format.clamp(i128::MAX), max, "{:?}", format);
            assert_eq!(format.clamp(min), min, "{:?}", format);
            assert_eq!(format.clamp(max), max, "{:?}", format);
        }
        assert_eq!(IntegerFormat::U16.clamp(-5), 0);
        assert_eq!(IntegerFormat::I16.clamp(100000), 32767);
    }

    #[test]
    fn in_range_values_survive_the_wire() {
        for format in ALL_FORMATS {
            for value in [format.min_value(), -1, 0, 1, 100, format.max_value()] {
                let expected = format.clamp(value);
                let bytes = format.encode(value);
                assert_eq!(bytes.len(), format.size());
                assert_eq!(format.decode(&bytes), expected, "{:?} {}", format, value);
            }
        }
    }

    #[test]
    fn encode_layout() {
        assert_eq!(IntegerFormat::I16.encode(-2), vec![0xfe, 0xff]);
        assert_eq!(IntegerFormat::U16.encode(-5), vec![0x00, 0x00]);
        assert_eq!(IntegerFormat::I16.encode(100000), vec![0xff, 0x7f]);
        assert_eq!(IntegerFormat::U8.encode(0x1ff), vec![0xff]);
        assert_eq!(IntegerFormat::U32.encode(0x1234_5678), vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn decode_sign_extends() {
        assert_eq!(IntegerFormat::I8.decode(&[0x80]), -128);
        assert_eq!(IntegerFormat::U8.decode(&[0x80]), 128);
        assert_eq!(IntegerFormat::I16.decode(&[0x00, 0x80]), -32768);
        assert_eq!(IntegerFormat::U64.decode(&[0xff; 8]), u64::MAX as i128);
        assert_eq!(IntegerFormat::I64.decode(&[0xff; 8]), -1);
        // Short reply, high byte missing.
        assert_eq!(IntegerFormat::U16.decode(&[0x40]), 0x40);
    }

    #[test]
    fn read_uses_native_length() {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x04, 0x01);
        channel.respond(RequestCode::GetCur, selector, &[0x9c, 0x00, 0x00, 0x00]);

        assert_eq!(
            IntegerFormat::U32.read(&channel, RequestCode::GetCur, selector),
            Some(156)
        );
        assert_eq!(channel.log.borrow()[0].0.length, 4);
        assert_eq!(
            IntegerFormat::U32.read(&channel, RequestCode::GetMin, selector),
            None
        );
    }

    #[test]
    fn write_sends_clamped_value() {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x02, 0x02);
        channel.respond(RequestCode::GetCur, selector, &[0, 0]);

        assert!(IntegerFormat::I16.write(&channel, selector, 100000));
        assert_eq!(channel.log.borrow()[0].1, vec![0xff, 0x7f]);
        assert_eq!(
            IntegerFormat::I16.read(&channel, RequestCode::GetCur, selector),
            Some(32767)
        );

        assert!(!IntegerFormat::U8.write(&channel, Selector::new(0x11, 0x02), 1));
    }
}
