//! In-memory stand-in for a Nanosyncs on the other end of the transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use nanosync_midi::Error;
use nanosync_midi::transport::SysexTransport;

const VENDOR_HEADER: [u8; 4] = [0xF0, 0x2C, 0x4E, 0x53];
const SYSEX_END: u8 = 0xF7;

/// Front-panel defaults from the device manual: internal reference, ntsc,
/// 1080p x2 fps, 30 fps, all SDI outputs HD, audio following video.
pub const DEFAULT_CONFIG: [u8; 20] = [
    0, 1, 1, 3, 5, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Observable state of the fake device, shared with the test body.
#[derive(Debug)]
pub struct DeviceState {
    /// The configuration block the device currently holds.
    pub config: [u8; 20],
    /// Responses queued for the host.
    pub inbox: VecDeque<Vec<u8>>,
    /// Number of write frames received.
    pub write_frames: usize,
    /// Number of frames of any kind received.
    pub sent_frames: usize,
    /// Number of times the host polled for a message.
    pub receive_calls: usize,
    /// Number of times the host closed the transport.
    pub close_calls: usize,
    /// True once the transport has been closed; traffic is rejected after.
    pub closed: bool,
    /// When true, write frames are accepted but never change the block.
    pub drop_writes: bool,
    /// When true, the device stops answering entirely.
    pub muted: bool,
}

/// Transport whose far end behaves like a Nanosyncs.
///
/// Answers identity and configuration queries from its [`DeviceState`] and
/// applies (or, when `drop_writes` is set, silently discards) configuration
/// writes. Writes are never acknowledged, matching the real device.
#[derive(Debug)]
pub struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    pub fn new(config: [u8; 20]) -> (Self, Arc<Mutex<DeviceState>>) {
        let state = Arc::new(Mutex::new(DeviceState {
            config,
            inbox: VecDeque::new(),
            write_frames: 0,
            sent_frames: 0,
            receive_calls: 0,
            close_calls: 0,
            closed: false,
            drop_writes: false,
            muted: false,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl SysexTransport for FakeDevice {
    fn send(&mut self, message: &[u8]) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(Error::PortClosed);
        }
        state.sent_frames += 1;
        assert!(
            message.starts_with(&VENDOR_HEADER) && message.last() == Some(&SYSEX_END),
            "host sent an unframed message: {message:02X?}"
        );
        let mut response = VENDOR_HEADER.to_vec();
        match message[4] {
            // Serial number and firmware query.
            0x01 => {
                response.push(0x01);
                response.extend_from_slice(b"12340123");
            }
            // Current configuration query.
            0x03 => {
                response.push(0x03);
                let config = state.config;
                response.extend_from_slice(&config);
            }
            // Configuration write: applied silently, never acknowledged.
            0x0F => {
                state.write_frames += 1;
                if !state.drop_writes {
                    state.config.copy_from_slice(&message[5..25]);
                }
                return Ok(());
            }
            other => panic!("host sent an unknown command byte {other:#04X}"),
        }
        response.push(SYSEX_END);
        if !state.muted {
            state.inbox.push_back(response);
        }
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(Error::PortClosed);
        }
        state.receive_calls += 1;
        if state.muted {
            return Ok(None);
        }
        Ok(state.inbox.pop_front())
    }

    fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        state.closed = true;
    }
}
