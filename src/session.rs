//! Protocol session: handshake, identity, and bounded-retry receipt.

use std::thread;
use std::time::Duration;

use crate::error::Error;
use crate::sysex::{self, Purpose};
use crate::transport::SysexTransport;

/// Maximum number of polls before a receive gives up.
pub const RECEIVE_ATTEMPTS: usize = 5;
/// Pause between empty polls.
pub const RECEIVE_INTERVAL: Duration = Duration::from_millis(100);

/// Serial number and firmware version captured at connect time.
///
/// Read-only after the handshake; the device never changes either while a
/// session is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Four-character device serial number.
    pub serial_number: String,
    /// Firmware version, rendered as `"MM.mm"`.
    pub firmware_version: String,
}

impl DeviceIdentity {
    /// Decode the eight-byte identity payload.
    ///
    /// Four ASCII serial bytes followed by four ASCII firmware bytes; the
    /// firmware version gains a decimal point after the second character, so
    /// raw `"0123"` becomes `"01.23"`.
    pub(crate) fn from_payload(payload: &[u8]) -> Result<Self, Error> {
        // Both fields are ASCII; anything else cannot be an identity
        // response, and slicing the version at a fixed byte offset is only
        // sound for single-byte characters.
        if payload.len() != 8 || !payload.is_ascii() {
            return Err(Error::MalformedMessage);
        }
        let serial_number = String::from_utf8_lossy(&payload[..4]).into_owned();
        let firmware = String::from_utf8_lossy(&payload[4..]);
        Ok(Self {
            serial_number,
            firmware_version: format!("{}.{}", &firmware[..2], &firmware[2..]),
        })
    }
}

/// An established session with a Nanosyncs.
///
/// Owns the duplex transport exclusively and holds the [`DeviceIdentity`]
/// captured by the connect handshake. The protocol has no request IDs, so a
/// session must never be used for interleaved exchanges; every operation is a
/// blocking send followed by a bounded-retry receive.
#[derive(Debug)]
pub struct Session<T: SysexTransport> {
    transport: T,
    identity: DeviceIdentity,
}

impl<T: SysexTransport> Session<T> {
    /// Perform the connect handshake over an open transport.
    ///
    /// Sends the serial-number query and waits (bounded) for the identity
    /// response. On success the session is ready for configuration traffic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandshakeFailed`] if no response arrives within the
    /// retry budget, or [`Error::MalformedMessage`] if the response cannot be
    /// decoded into identity fields. No partial session is exposed on error.
    pub fn establish(mut transport: T) -> Result<Self, Error> {
        transport.send(&sysex::frame(&sysex::IDENTITY_QUERY, Purpose::Query))?;
        let response = match receive_with_retry(&mut transport) {
            Ok(message) => message,
            Err(Error::NoResponse) => return Err(Error::HandshakeFailed),
            Err(other) => return Err(other),
        };
        let payload = sysex::unframe(&response, Purpose::Write)?;
        let identity = DeviceIdentity::from_payload(payload)?;
        log::info!(
            "connected to Nanosyncs, serial {}, firmware {}",
            identity.serial_number,
            identity.firmware_version
        );
        Ok(Self {
            transport,
            identity,
        })
    }

    /// The identity captured during the handshake.
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Send one framed message to the device.
    ///
    /// No acknowledgement is expected at this layer.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn send(&mut self, framed: &[u8]) -> Result<(), Error> {
        self.transport.send(framed)
    }

    /// Wait (bounded) for the next message from the device.
    ///
    /// Polls the transport up to [`RECEIVE_ATTEMPTS`] times with
    /// [`RECEIVE_INTERVAL`] between empty polls and returns the first
    /// non-empty message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResponse`] once all attempts are exhausted.
    pub fn receive_with_retry(&mut self) -> Result<Vec<u8>, Error> {
        receive_with_retry(&mut self.transport)
    }

    /// Release both directions of the transport. Idempotent.
    pub fn close(&mut self) {
        self.transport.close();
    }
}

fn receive_with_retry<T: SysexTransport>(transport: &mut T) -> Result<Vec<u8>, Error> {
    for attempt in 1..=RECEIVE_ATTEMPTS {
        if let Some(message) = transport.try_receive()? {
            return Ok(message);
        }
        if attempt < RECEIVE_ATTEMPTS {
            thread::sleep(RECEIVE_INTERVAL);
        }
    }
    Err(Error::NoResponse)
}
