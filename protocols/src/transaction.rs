// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Request/response transaction protocol on the vendor specific interface.
//!
//! Every command is a pair of USB control transfers; one to transmit the request frame, one to
//! read the response frame. Both frames begin with a 16 byte header in little endian order:
//!
//! ```text
//! cmd: u32, size: u16, seq: u16, error: u32, pad: u32
//! ```
//!
//! The sequence number increases by one for each request. The unit echoes command and sequence
//! number in the response, with the single documented exception during initialisation where a
//! request with sequence number 1 is answered with sequence number 0.

use super::*;

/// The request to transmit a command frame.
pub const VENDOR_REQ_CMD_TX: u8 = 2;
/// The request to read a response frame.
pub const VENDOR_REQ_CMD_RX: u8 = 3;
/// The request to read the initialisation frame.
pub const VENDOR_REQ_INIT: u8 = 0;

pub const CMD_INIT_1: u32 = 0x00000000;
pub const CMD_INIT_2: u32 = 0x00000002;
pub const CMD_GET_METER_LEVELS: u32 = 0x00001001;
pub const CMD_GET_MIX: u32 = 0x00002001;
pub const CMD_SET_MIX: u32 = 0x00002002;
pub const CMD_GET_MUX: u32 = 0x00003001;
pub const CMD_SET_MUX: u32 = 0x00003002;
pub const CMD_GET_SYNC: u32 = 0x00006004;
pub const CMD_GET_DATA: u32 = 0x00800000;
pub const CMD_SET_DATA: u32 = 0x00800001;
pub const CMD_DATA_CMD: u32 = 0x00800002;

/// The value for `CMD_DATA_CMD` to persist the current configuration to NVRAM.
pub const DATA_CMD_CONFIG_SAVE: u32 = 0x00000006;

// Bits of the first word of a change notification delivered on the interrupt endpoint.
pub const NOTIFY_ACK: u32 = 0x00000001;
pub const NOTIFY_SYNC_CHANGE: u32 = 0x00000008;
pub const NOTIFY_BUTTON_CHANGE: u32 = 0x00200000;
pub const NOTIFY_VOL_CHANGE: u32 = 0x00400000;
pub const NOTIFY_LINE_CTL_CHANGE: u32 = 0x00800000;
pub const NOTIFY_SPEAKER_CHANGE: u32 = 0x01000000;

/// The length of frame header.
pub const FRAME_HEADER_SIZE: usize = 16;

/// The length of the frame read at the very beginning of the initialisation sequence.
pub const INIT_FRAME_SIZE: usize = FRAME_HEADER_SIZE + 8;

/// The length of payload in the response to `CMD_INIT_2`.
const INIT_2_RESPONSE_SIZE: usize = 84;

/// Bulk reads and writes of data space are split into chunks of the size at most.
pub const DATA_TRANSFER_CHUNK_SIZE: usize = 992;

/// Abstraction of the vendor specific interface of the unit.
///
/// The implementation transfers raw frames; framing, sequencing, and validation belong to the
/// protocol layer.
pub trait Scarlett2Transport {
    /// Transmit one command frame.
    fn transmit_command(&mut self, frame: &[u8], timeout_ms: u32) -> Result<(), Error>;
    /// Read one response frame. The frame must be read in full.
    fn receive_response(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error>;
    /// Read the initialisation frame.
    fn receive_init_frame(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error>;
}

/// State required to drive the transaction protocol; the transport and the sequence counter.
///
/// One exchange (transmission of request and receipt of response) is a critical section against
/// the vendor interface. Implementations expose it under exclusive access so that commands never
/// interleave on the wire.
pub trait Scarlett2Protocol {
    /// Perform one exchange of request and response frames.
    fn exchange_frames(
        &mut self,
        req_frame: &[u8],
        resp_frame: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), Error>;

    /// Read the initialisation frame.
    fn read_init_frame(&mut self, frame: &mut [u8], timeout_ms: u32) -> Result<(), Error>;

    /// The sequence number for the next command. The counter increments behind and wraps freely.
    fn next_sequence_number(&mut self) -> u16;

    /// Seed the sequence counter. The initialisation sequence does this twice.
    fn seed_sequence_number(&mut self, value: u16);
}

fn build_command_frame(cmd: u32, seq: u16, data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + data.len());
    frame.extend_from_slice(&cmd.to_le_bytes());
    frame.extend_from_slice(&(data.len() as u16).to_le_bytes());
    frame.extend_from_slice(&seq.to_le_bytes());
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame.extend_from_slice(data);
    frame
}

fn parse_response_frame<'a>(
    frame: &'a [u8],
    cmd: u32,
    seq: u16,
    resp_size: usize,
) -> Result<&'a [u8], Error> {
    let mut quadlet = [0; 4];
    let mut doublet = [0; 2];

    quadlet.copy_from_slice(&frame[..4]);
    let resp_cmd = u32::from_le_bytes(quadlet);
    doublet.copy_from_slice(&frame[4..6]);
    let size = u16::from_le_bytes(doublet) as usize;
    doublet.copy_from_slice(&frame[6..8]);
    let resp_seq = u16::from_le_bytes(doublet);
    quadlet.copy_from_slice(&frame[8..12]);
    let error = u32::from_le_bytes(quadlet);
    quadlet.copy_from_slice(&frame[12..16]);
    let pad = u32::from_le_bytes(quadlet);

    // Sequence number 0 is a valid answer to sequence number 1 during initialisation.
    let seq_matches = resp_seq == seq || (seq == 1 && resp_seq == 0);

    if resp_cmd != cmd || !seq_matches || size != resp_size || error != 0 || pad != 0 {
        let msg = format!(
            "invalid response; cmd tx/rx {:08x}/{:08x} seq {}/{} size {}/{} error {} pad {}",
            cmd, resp_cmd, seq, resp_seq, resp_size, size, error, pad,
        );
        Err(Error::new(Scarlett2ControlError::ProtocolMismatch, &msg))
    } else {
        Ok(&frame[FRAME_HEADER_SIZE..(FRAME_HEADER_SIZE + resp_size)])
    }
}

/// Protocol operations provided for any implementation of [`Scarlett2Protocol`].
pub trait Scarlett2ProtocolExtManual: Scarlett2Protocol {
    /// Issue one command and return the payload of its validated response.
    fn transaction(
        &mut self,
        cmd: u32,
        args: &[u8],
        resp_size: usize,
        timeout_ms: u32,
    ) -> Result<Vec<u8>, Error> {
        let seq = self.next_sequence_number();
        let req_frame = build_command_frame(cmd, seq, args);
        let mut resp_frame = vec![0; FRAME_HEADER_SIZE + resp_size];
        self.exchange_frames(&req_frame, &mut resp_frame, timeout_ms)?;
        parse_response_frame(&resp_frame, cmd, seq, resp_size).map(|data| data.to_vec())
    }

    /// Read from the data space of the unit, split into bounded chunks.
    fn read_data(&mut self, offset: usize, length: usize, timeout_ms: u32) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(length);
        let mut pos = 0;
        while pos < length {
            let chunk = std::cmp::min(length - pos, DATA_TRANSFER_CHUNK_SIZE);
            let mut args = [0; 8];
            args[..4].copy_from_slice(&((offset + pos) as u32).to_le_bytes());
            args[4..].copy_from_slice(&(chunk as u32).to_le_bytes());
            let data = self.transaction(CMD_GET_DATA, &args, chunk, timeout_ms)?;
            buf.extend_from_slice(&data);
            pos += chunk;
        }
        Ok(buf)
    }

    /// Write into the data space of the unit, split into bounded chunks.
    fn write_data(&mut self, offset: usize, data: &[u8], timeout_ms: u32) -> Result<(), Error> {
        let mut pos = 0;
        while pos < data.len() {
            let chunk = std::cmp::min(data.len() - pos, DATA_TRANSFER_CHUNK_SIZE);
            let mut args = Vec::with_capacity(8 + chunk);
            args.extend_from_slice(&((offset + pos) as u32).to_le_bytes());
            args.extend_from_slice(&(chunk as u32).to_le_bytes());
            args.extend_from_slice(&data[pos..(pos + chunk)]);
            self.transaction(CMD_SET_DATA, &args, 0, timeout_ms)?;
            pos += chunk;
        }
        Ok(())
    }

    /// Invoke the named on-device action.
    fn data_command(&mut self, value: u32, timeout_ms: u32) -> Result<(), Error> {
        self.transaction(CMD_DATA_CMD, &value.to_le_bytes(), 0, timeout_ms)
            .map(|_| ())
    }

    /// Ask the unit to persist the current configuration to NVRAM.
    fn save_configuration(&mut self, timeout_ms: u32) -> Result<(), Error> {
        self.data_command(DATA_CMD_CONFIG_SAVE, timeout_ms)
    }

    /// The proprietary initialisation sequence. The order of commands and the two re-seedings of
    /// the sequence counter are a contract of the device firmware.
    fn initialize(&mut self, timeout_ms: u32) -> Result<(), Error> {
        let mut frame = [0; INIT_FRAME_SIZE];
        self.read_init_frame(&mut frame, timeout_ms)?;

        self.seed_sequence_number(1);
        self.transaction(CMD_INIT_1, &[], 0, timeout_ms)?;

        self.seed_sequence_number(1);
        self.transaction(CMD_INIT_2, &[], INIT_2_RESPONSE_SIZE, timeout_ms)
            .map(|_| ())
    }
}

impl<O: Scarlett2Protocol> Scarlett2ProtocolExtManual for O {}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Scripted stand-in for the unit. Requests are recorded, responses are played back in
    /// order with header fields echoed from the request.
    #[derive(Default)]
    pub(crate) struct TestProtocol {
        pub seq: u16,
        pub requests: Vec<Vec<u8>>,
        pub responses: Vec<Vec<u8>>,
        /// Force the fields of the next response header.
        pub override_header: Option<(u32, u16, u32, u32)>,
    }

    impl TestProtocol {
        pub(crate) fn queue_response(&mut self, data: &[u8]) {
            self.responses.push(data.to_vec());
        }
    }

    impl Scarlett2Protocol for TestProtocol {
        fn exchange_frames(
            &mut self,
            req_frame: &[u8],
            resp_frame: &mut [u8],
            _: u32,
        ) -> Result<(), Error> {
            self.requests.push(req_frame.to_vec());

            let data = if self.responses.is_empty() {
                Vec::new()
            } else {
                self.responses.remove(0)
            };

            let (cmd, seq, error, pad) = match self.override_header.take() {
                Some(header) => header,
                None => {
                    let mut quadlet = [0; 4];
                    let mut doublet = [0; 2];
                    quadlet.copy_from_slice(&req_frame[..4]);
                    doublet.copy_from_slice(&req_frame[6..8]);
                    (
                        u32::from_le_bytes(quadlet),
                        u16::from_le_bytes(doublet),
                        0,
                        0,
                    )
                }
            };

            resp_frame[..4].copy_from_slice(&cmd.to_le_bytes());
            resp_frame[4..6].copy_from_slice(&(data.len() as u16).to_le_bytes());
            resp_frame[6..8].copy_from_slice(&seq.to_le_bytes());
            resp_frame[8..12].copy_from_slice(&error.to_le_bytes());
            resp_frame[12..16].copy_from_slice(&pad.to_le_bytes());
            let length = std::cmp::min(resp_frame.len() - FRAME_HEADER_SIZE, data.len());
            resp_frame[FRAME_HEADER_SIZE..(FRAME_HEADER_SIZE + length)]
                .copy_from_slice(&data[..length]);

            Ok(())
        }

        fn read_init_frame(&mut self, _: &mut [u8], _: u32) -> Result<(), Error> {
            Ok(())
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

    #[test]
    fn command_frame_layout() {
        let frame = build_command_frame(CMD_SET_DATA, 0x1234, &[0xde, 0xad]);
        assert_eq!(frame.len(), FRAME_HEADER_SIZE + 2);
        assert_eq!(&frame[..4], &[0x01, 0x00, 0x80, 0x00]);
        assert_eq!(&frame[4..6], &[0x02, 0x00]);
        assert_eq!(&frame[6..8], &[0x34, 0x12]);
        assert_eq!(&frame[8..16], &[0; 8]);
        assert_eq!(&frame[16..], &[0xde, 0xad]);
    }

    #[test]
    fn response_validation() {
        let frame = build_command_frame(CMD_GET_DATA, 9, &[0xaa; 4]);
        assert_eq!(
            parse_response_frame(&frame, CMD_GET_DATA, 9, 4).unwrap(),
            &[0xaa; 4]
        );

        // Command mismatch.
        assert!(parse_response_frame(&frame, CMD_SET_DATA, 9, 4).is_err());
        // Sequence mismatch.
        assert!(parse_response_frame(&frame, CMD_GET_DATA, 10, 4).is_err());
        // Size mismatch.
        assert!(parse_response_frame(&frame, CMD_GET_DATA, 9, 2).is_err());

        let mut frame = build_command_frame(CMD_GET_DATA, 9, &[0xaa; 4]);
        frame[8] = 1;
        assert!(parse_response_frame(&frame, CMD_GET_DATA, 9, 4).is_err());

        let mut frame = build_command_frame(CMD_GET_DATA, 9, &[0xaa; 4]);
        frame[12] = 1;
        assert!(parse_response_frame(&frame, CMD_GET_DATA, 9, 4).is_err());
    }

    #[test]
    fn init_sequence_number_exception() {
        let frame = build_command_frame(CMD_INIT_2, 0, &[]);
        assert!(parse_response_frame(&frame, CMD_INIT_2, 1, 0).is_ok());
        assert!(parse_response_frame(&frame, CMD_INIT_2, 2, 0).is_err());
    }

    #[test]
    fn initialization_sequence() {
        let mut proto = TestProtocol::default();
        proto.seq = 100;
        proto.queue_response(&[]);
        proto.override_header = None;
        proto.responses.push(vec![0; INIT_2_RESPONSE_SIZE]);

        proto.initialize(10).unwrap();

        assert_eq!(proto.requests.len(), 2);
        // Both commands carry sequence number 1 after re-seeding.
        [CMD_INIT_1, CMD_INIT_2]
            .iter()
            .zip(&proto.requests)
            .for_each(|(&cmd, frame)| {
                assert_eq!(&frame[..4], &cmd.to_le_bytes());
                assert_eq!(&frame[6..8], &1u16.to_le_bytes());
            });
    }

    #[test]
    fn bulk_transfer_chunking() {
        let mut proto = TestProtocol::default();
        let image = vec![0x5a; DATA_TRANSFER_CHUNK_SIZE + 100];
        proto.queue_response(&image[..DATA_TRANSFER_CHUNK_SIZE]);
        proto.queue_response(&image[DATA_TRANSFER_CHUNK_SIZE..]);

        let data = proto.read_data(0x1000, image.len(), 10).unwrap();
        assert_eq!(data, image);

        assert_eq!(proto.requests.len(), 2);
        let frame = &proto.requests[1];
        let mut quadlet = [0; 4];
        quadlet.copy_from_slice(&frame[16..20]);
        assert_eq!(
            u32::from_le_bytes(quadlet) as usize,
            0x1000 + DATA_TRANSFER_CHUNK_SIZE
        );
        quadlet.copy_from_slice(&frame[20..24]);
        assert_eq!(u32::from_le_bytes(quadlet) as usize, 100);

        proto.requests.clear();
        proto.write_data(0x20, &image, 10).unwrap();
        assert_eq!(proto.requests.len(), 2);
        assert_eq!(
            proto.requests[0].len(),
            FRAME_HEADER_SIZE + 8 + DATA_TRANSFER_CHUNK_SIZE
        );
        assert_eq!(proto.requests[1].len(), FRAME_HEADER_SIZE + 8 + 100);
    }
}
