// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use log::debug;

use crate::RequestCode;
use crate::Selector;
use crate::TransferStatus;
use crate::UsbRequestSetup;

/// Outcome of a synchronous control transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransferCompletion {
    pub status: TransferStatus,
    /// Number of data stage bytes actually moved, which may be less than the
    /// requested length.
    pub bytes_transferred: usize,
}

impl TransferCompletion {
    pub fn completed(bytes_transferred: usize) -> TransferCompletion {
        TransferCompletion {
            status: TransferStatus::Completed,
            bytes_transferred,
        }
    }

    pub fn failed(status: TransferStatus) -> TransferCompletion {
        TransferCompletion {
            status,
            bytes_transferred: 0,
        }
    }
}

/// A channel able to perform blocking control transfers on the default pipe
/// of a device, typically an opened video control interface.
///
/// Implementations are not required to serialize concurrent calls; sharing one
/// channel between threads requires the implementation to do so itself.
pub trait ControlTransfer {
    /// Perform the control transfer described by `setup`. `buffer` holds the data
    /// stage: it is written to the device for host-to-device requests and
    /// filled from the device otherwise. `buffer.len()` equals `setup.length`.
    fn control_transfer(&self, setup: &UsbRequestSetup, buffer: &mut [u8]) -> TransferCompletion;
}

/// Issue a device-to-host `request` for `selector` with a data stage of `length`
/// bytes. Returns the bytes the device sent, or `None` if it sent nothing.
pub fn in_request<C: ControlTransfer + ?Sized>(
    channel: &C,
    request: RequestCode,
    selector: Selector,
    length: u16,
) -> Option<Vec<u8>> {
    let setup = selector.setup(request, length);
    let mut buffer = vec![0u8; usize::from(length)];
    let completion = channel.control_transfer(&setup, &mut buffer);
    if completion.bytes_transferred == 0 {
        debug!(
            "{:?} declined for selector {:#04x} on entity {}: {:?}",
            request, selector.index, selector.target, completion.status
        );
        return None;
    }
    buffer.truncate(completion.bytes_transferred.min(buffer.len()));
    Some(buffer)
}

/// Issue a host-to-device `request` for `selector` carrying `data`.
pub fn out_request<C: ControlTransfer + ?Sized>(
    channel: &C,
    request: RequestCode,
    selector: Selector,
    data: &[u8],
) -> TransferCompletion {
    let length = match u16::try_from(data.len()) {
        Ok(length) => length,
        Err(_) => return TransferCompletion::failed(TransferStatus::Error),
    };
    let setup = selector.setup(request, length);
    let mut buffer = data.to_vec();
    let completion = channel.control_transfer(&setup, &mut buffer);
    if completion.status != TransferStatus::Completed {
        debug!(
            "{:?} failed for selector {:#04x} on entity {}: {:?}",
            request, selector.index, selector.target, completion.status
        );
    }
    completion
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use super::*;
    use crate::ControlRequestDataPhaseTransferDirection;
    use crate::ControlRequestRecipient;
    use crate::ControlRequestType;

    /// Scripted device answering GET requests from a table and recording every
    /// setup packet it receives.
    #[derive(Default)]
    pub struct FakeChannel {
        // (bRequest, selector index, entity id) -> response bytes
        responses: RefCell<BTreeMap<(u8, u8, u8), Vec<u8>>>,
        pub log: RefCell<Vec<(UsbRequestSetup, Vec<u8>)>>,
    }

    impl FakeChannel {
        pub fn new() -> FakeChannel {
            FakeChannel::default()
        }

        pub fn respond(&self, request: RequestCode, selector: Selector, data: &[u8]) {
            self.responses.borrow_mut().insert(
                (request as u8, selector.index, selector.target),
                data.to_vec(),
            );
        }

        pub fn requests(&self, request: RequestCode) -> usize {
            self.log
                .borrow()
                .iter()
                .filter(|(setup, _)| setup.request == request as u8)
                .count()
        }
    }

    impl ControlTransfer for FakeChannel {
        fn control_transfer(
            &self,
            setup: &UsbRequestSetup,
            buffer: &mut [u8],
        ) -> TransferCompletion {
            assert_eq!(usize::from(setup.length), buffer.len());
            // Every UVC control request is a class request to the video control
            // interface, which is interface 0 here.
            assert_eq!(setup.get_type(), ControlRequestType::Class);
            assert_eq!(setup.get_recipient(), Some(ControlRequestRecipient::Interface));
            assert_eq!(setup.index & 0xff, 0);
            let key = (
                setup.request,
                (setup.value >> 8) as u8,
                (setup.index >> 8) as u8,
            );
            let completion = match setup.get_direction() {
                ControlRequestDataPhaseTransferDirection::DeviceToHost => {
                    match self.responses.borrow().get(&key) {
                        Some(data) => {
                            let n = data.len().min(buffer.len());
                            buffer[..n].copy_from_slice(&data[..n]);
                            TransferCompletion::completed(n)
                        }
                        None => TransferCompletion::failed(TransferStatus::Stalled),
                    }
                }
                ControlRequestDataPhaseTransferDirection::HostToDevice => {
                    // SET_CUR is accepted for any control that answers GET_CUR and
                    // becomes its new current value.
                    let cur = (RequestCode::GetCur as u8, key.1, key.2);
                    let mut responses = self.responses.borrow_mut();
                    if responses.contains_key(&cur) {
                        responses.insert(cur, buffer.to_vec());
                        TransferCompletion::completed(buffer.len())
                    } else {
                        TransferCompletion::failed(TransferStatus::Stalled)
                    }
                }
            };
            self.log.borrow_mut().push((*setup, buffer.to_vec()));
            completion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeChannel;
    use super::*;

    #[test]
    fn in_request_returns_transferred_bytes() {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x02, 0x03);
        channel.respond(RequestCode::GetCur, selector, &[0x34, 0x12]);

        assert_eq!(
            in_request(&channel, RequestCode::GetCur, selector, 2),
            Some(vec![0x34, 0x12])
        );
        let log = channel.log.borrow();
        assert_eq!(log[0].0, UsbRequestSetup::new(0xa1, 0x81, 0x0200, 0x0300, 2));
    }

    #[test]
    fn in_request_short_transfer_is_truncated() {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x04, 0x01);
        channel.respond(RequestCode::GetMax, selector, &[0x10]);

        assert_eq!(
            in_request(&channel, RequestCode::GetMax, selector, 4),
            Some(vec![0x10])
        );
    }

    #[test]
    fn in_request_without_data_is_none() {
        let channel = FakeChannel::new();
        assert_eq!(
            in_request(&channel, RequestCode::GetInf, Selector::new(1, 1), 1),
            None
        );
    }

    #[test]
    fn out_request_sends_data() {
        let channel = FakeChannel::new();
        let selector = Selector::new(0x0a, 0x02);
        channel.respond(RequestCode::GetCur, selector, &[0, 0]);

        let completion = out_request(&channel, RequestCode::SetCur, selector, &[0x70, 0x17]);
        assert_eq!(completion, TransferCompletion::completed(2));
        let log = channel.log.borrow();
        assert_eq!(log[0].0, UsbRequestSetup::new(0x21, 0x01, 0x0a00, 0x0200, 2));
        assert_eq!(log[0].1, vec![0x70, 0x17]);
    }
}
