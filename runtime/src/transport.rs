// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! USB transport for the vendor specific interface.
//!
//! The vendor interface is the one with class code 0xff in the configuration descriptor. The
//! request/response pairs travel as class specific control transfers addressed to it; change
//! notifications arrive on its interrupt endpoint, served by a dedicated dispatcher thread
//! standing in for an asynchronous URB.

use {
    super::*,
    rusb::{
        Context, Device, DeviceHandle, Direction, Recipient, RequestType, TransferType,
        UsbContext,
    },
    std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            mpsc, Arc,
        },
        thread,
        time::Duration,
    },
    tracing::{debug, warn},
};

/// Description of the located vendor interface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VendorInterface {
    pub number: u8,
    pub interrupt_endpoint: u8,
    pub max_packet_size: usize,
}

fn transfer_err(cause: rusb::Error) -> Error {
    let msg = format!("USB transfer failed: {}", cause);
    Error::new(Scarlett2ControlError::IoTransport, &msg)
}

/// Walk the configuration descriptor for the vendor specific interface.
fn find_vendor_interface(device: &Device<Context>) -> Option<VendorInterface> {
    let config = device.active_config_descriptor().ok()?;

    config
        .interfaces()
        .flat_map(|interface| interface.descriptors())
        .find(|desc| desc.class_code() == 0xff)
        .and_then(|desc| {
            desc.endpoint_descriptors()
                .find(|endpoint| {
                    endpoint.direction() == Direction::In
                        && endpoint.transfer_type() == TransferType::Interrupt
                })
                .map(|endpoint| VendorInterface {
                    number: desc.interface_number(),
                    interrupt_endpoint: endpoint.address(),
                    max_packet_size: endpoint.max_packet_size() as usize,
                })
        })
}

/// Locate and claim the first supported unit on the bus.
pub fn open_unit(
    product_ids: &[u16],
) -> Result<(Arc<DeviceHandle<Context>>, u16, VendorInterface), Error> {
    let ctx = Context::new().map_err(transfer_err)?;
    let devices = ctx.devices().map_err(transfer_err)?;

    for device in devices.iter() {
        let desc = match device.device_descriptor() {
            Ok(desc) => desc,
            Err(_) => continue,
        };
        if desc.vendor_id() != VENDOR_ID || !product_ids.contains(&desc.product_id()) {
            continue;
        }

        let iface = find_vendor_interface(&device).ok_or_else(|| {
            let msg = "no vendor specific interface in configuration descriptor";
            Error::new(Scarlett2ControlError::NotSupported, msg)
        })?;

        let mut handle = device.open().map_err(transfer_err)?;
        let _ = handle.set_auto_detach_kernel_driver(true);
        handle.claim_interface(iface.number).map_err(transfer_err)?;

        debug!(
            product_id = desc.product_id(),
            interface = iface.number,
            endpoint = iface.interrupt_endpoint,
        );

        return Ok((Arc::new(handle), desc.product_id(), iface));
    }

    Err(Error::new(
        Scarlett2ControlError::NotSupported,
        "no supported unit found",
    ))
}

/// The transport over the claimed vendor interface.
pub struct UsbTransport {
    handle: Arc<DeviceHandle<Context>>,
    iface: u8,
}

impl UsbTransport {
    pub fn new(handle: Arc<DeviceHandle<Context>>, iface: u8) -> Self {
        Self { handle, iface }
    }
}

impl Scarlett2Transport for UsbTransport {
    fn transmit_command(&mut self, frame: &[u8], timeout_ms: u32) -> Result<(), Error> {
        let request_type =
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        let written = self
            .handle
            .write_control(
                request_type,
                VENDOR_REQ_CMD_TX,
                0,
                self.iface as u16,
                frame,
                Duration::from_millis(timeout_ms as u64),
            )
            .map_err(transfer_err)?;
        if written != frame.len() {
            let msg = format!("short write: {}/{}", written, frame.len());
            Err(Error::new(Scarlett2ControlError::IoTransport, &msg))?;
        }
        Ok(())
    }

    fn receive_response(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error> {
        let request_type =
            rusb::request_type(Direction::In, RequestType::Class, Recipient::Interface);
        let read = self
            .handle
            .read_control(
                request_type,
                VENDOR_REQ_CMD_RX,
                0,
                self.iface as u16,
                frame,
                Duration::from_millis(timeout_ms as u64),
            )
            .map_err(transfer_err)?;
        if read != frame.len() {
            let msg = format!("short read: {}/{}", read, frame.len());
            Err(Error::new(Scarlett2ControlError::IoTransport, &msg))?;
        }
        Ok(())
    }

    fn receive_init_frame(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error> {
        let request_type =
            rusb::request_type(Direction::In, RequestType::Class, Recipient::Interface);
        let read = self
            .handle
            .read_control(
                request_type,
                VENDOR_REQ_INIT,
                0,
                self.iface as u16,
                frame,
                Duration::from_millis(timeout_ms as u64),
            )
            .map_err(transfer_err)?;
        if read != frame.len() {
            let msg = format!("short read: {}/{}", read, frame.len());
            Err(Error::new(Scarlett2ControlError::IoTransport, &msg))?;
        }
        Ok(())
    }
}

/// The unit under control; transport plus the sequence counter of the transaction protocol.
///
/// Exclusive access to the structure is the critical section over the vendor interface; one
/// exchange of request and response frames never interleaves with another.
pub struct SndScarlett2 {
    transport: Box<dyn Scarlett2Transport + Send>,
    seq: u16,
}

impl SndScarlett2 {
    pub fn new(transport: Box<dyn Scarlett2Transport + Send>) -> Self {
        Self { transport, seq: 0 }
    }
}

impl Scarlett2Protocol for SndScarlett2 {
    fn exchange_frames(
        &mut self,
        req_frame: &[u8],
        resp_frame: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), Error> {
        self.transport.transmit_command(req_frame, timeout_ms)?;
        self.transport.receive_response(resp_frame, timeout_ms)
    }

    fn read_init_frame(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error> {
        self.transport.receive_init_frame(frame, timeout_ms)
    }

    fn next_sequence_number(&mut self) -> u16 {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        seq
    }

    fn seed_sequence_number(&mut self, value: u16) {
        self.seq = value;
    }
}

/// The length of one change notification.
const INTERRUPT_FRAME_SIZE: usize = 8;

const INTERRUPT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Dispatcher thread for change notifications from the interrupt endpoint.
///
/// The thread only flips staleness flags and posts the raw bitmask into the event channel; it
/// never issues commands of its own.
pub struct InterruptDispatcher {
    th: Option<thread::JoinHandle<()>>,
    should_stop: Arc<AtomicBool>,
}

impl InterruptDispatcher {
    pub fn run(
        handle: Arc<DeviceHandle<Context>>,
        iface: VendorInterface,
        flags: Arc<NotificationFlags>,
        tx: mpsc::SyncSender<Event>,
    ) -> Self {
        let should_stop = Arc::new(AtomicBool::new(false));

        let stop = Arc::clone(&should_stop);
        let th = thread::spawn(move || {
            let mut buf = vec![0; iface.max_packet_size.max(INTERRUPT_FRAME_SIZE)];

            while !stop.load(Ordering::Relaxed) {
                match handle.read_interrupt(
                    iface.interrupt_endpoint,
                    &mut buf,
                    INTERRUPT_READ_TIMEOUT,
                ) {
                    Ok(INTERRUPT_FRAME_SIZE) => {
                        let mut quadlet = [0; 4];
                        quadlet.copy_from_slice(&buf[..4]);
                        let mask = u32::from_le_bytes(quadlet);
                        flags.mark(mask);
                        let _ = tx.send(Event::Interrupt(mask));
                    }
                    Ok(length) => {
                        warn!("unexpected length of notification: {}", length);
                    }
                    Err(rusb::Error::Timeout) => (),
                    Err(rusb::Error::NoDevice) | Err(rusb::Error::Io) => {
                        let _ = tx.send(Event::Disconnected);
                        break;
                    }
                    Err(cause) => {
                        warn!("notification endpoint failed: {}", cause);
                    }
                }
            }
        });

        Self {
            th: Some(th),
            should_stop,
        }
    }
}

impl Drop for InterruptDispatcher {
    fn drop(&mut self) {
        self.should_stop.store(true, Ordering::Relaxed);
        if let Some(th) = self.th.take() {
            let _ = th.join();
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use {super::*, std::sync::Mutex};

    /// Shared record of the traffic of a scripted transport.
    #[derive(Default)]
    pub(crate) struct TransportLog {
        pub requests: Vec<Vec<u8>>,
        pub responses: Vec<Vec<u8>>,
        last_header: Vec<u8>,
    }

    /// Scripted transport for tests of the runtime; frames are recorded, responses are played
    /// back with the header echoed from the request.
    pub(crate) struct TestTransport {
        pub log: Arc<Mutex<TransportLog>>,
    }

    impl Scarlett2Transport for TestTransport {
        fn transmit_command(&mut self, frame: &[u8], _: u32) -> Result<(), Error> {
            let mut log = self.log.lock().unwrap();
            log.last_header = frame[..8].to_vec();
            log.requests.push(frame.to_vec());
            Ok(())
        }

        fn receive_response(&mut self, frame: &mut [u8], _: u32) -> Result<(), Error> {
            let mut log = self.log.lock().unwrap();
            let data = if log.responses.is_empty() {
                Vec::new()
            } else {
                log.responses.remove(0)
            };
            frame[..4].copy_from_slice(&log.last_header[..4]);
            frame[4..6].copy_from_slice(&(data.len() as u16).to_le_bytes());
            frame[6..8].copy_from_slice(&log.last_header[6..8]);
            frame[8..16].fill(0);
            let length = std::cmp::min(frame.len() - 16, data.len());
            frame[16..(16 + length)].copy_from_slice(&data[..length]);
            Ok(())
        }

        fn receive_init_frame(&mut self, _: &mut [u8], _: u32) -> Result<(), Error> {
            Ok(())
        }
    }

    /// A unit driven by a scripted transport, with shared access to its traffic.
    pub(crate) fn test_unit() -> (SndScarlett2, Arc<Mutex<TransportLog>>) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        let transport = TestTransport {
            log: Arc::clone(&log),
        };
        (SndScarlett2::new(Box::new(transport)), log)
    }
}
