//! Sysex framing for the Nanosyncs wire protocol.
//!
//! Every exchange with the device is a MIDI System Exclusive message: a
//! start-of-exclusive byte, the three-byte Nanosyncs vendor header, an
//! interior payload, and the end-of-exclusive terminator. Configuration
//! writes carry one extra command byte after the vendor header; responses
//! from the device carry a command echo in the same position.

use crate::error::Error;

/// Start-of-exclusive status byte.
const SYSEX_START: u8 = 0xF0;
/// End-of-exclusive status byte.
const SYSEX_END: u8 = 0xF7;
/// Start-of-exclusive plus the vendor and device bytes (`,NS` in ASCII).
const VENDOR_HEADER: [u8; 4] = [SYSEX_START, 0x2C, 0x4E, 0x53];
/// Command byte marking a configuration write.
const WRITE_COMMAND: u8 = 0x0F;
/// Write frames insert the command byte after the vendor header.
const WRITE_HEADER: [u8; 5] = [SYSEX_START, 0x2C, 0x4E, 0x53, WRITE_COMMAND];
/// Shortest frame the device ever produces (header, command echo, terminator).
const MIN_FRAME_LEN: usize = 6;

/// Query payload requesting the serial number and firmware version.
pub(crate) const IDENTITY_QUERY: [u8; 1] = [0x01];
/// Query payload requesting the current configuration block.
pub(crate) const CONFIG_QUERY: [u8; 1] = [0x03];

/// Purpose of a framed message, which determines its header shape.
///
/// Query frames place the command byte inside the payload, so their header is
/// just the vendor bytes. Write frames (and, with a command echo in place of
/// the write command, device responses) insert one extra byte after the
/// vendor header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// A request for data from the device.
    Query,
    /// A new configuration block being sent to the device.
    Write,
}

impl Purpose {
    /// Header bytes prepended to the payload.
    fn header(self) -> &'static [u8] {
        match self {
            Purpose::Query => &VENDOR_HEADER,
            Purpose::Write => &WRITE_HEADER,
        }
    }
}

/// Wrap a payload in the sysex header and terminator for the given purpose.
pub fn frame(payload: &[u8], purpose: Purpose) -> Vec<u8> {
    let header = purpose.header();
    let mut message = Vec::with_capacity(header.len() + payload.len() + 1);
    message.extend_from_slice(header);
    message.extend_from_slice(payload);
    message.push(SYSEX_END);
    message
}

/// Strip the sysex framing from a raw message, returning the interior payload.
///
/// The inverse of [`frame`] for the same purpose. Device responses use the
/// five-byte write-shaped prefix, with a command echo where an outgoing write
/// carries [the write command byte](Purpose::Write); only the four fixed
/// vendor bytes and the terminator are validated, so the echo passes through.
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] if the message is shorter than six
/// bytes, does not start with the vendor header, or does not end with the
/// end-of-exclusive terminator.
pub fn unframe(raw: &[u8], purpose: Purpose) -> Result<&[u8], Error> {
    if raw.len() < MIN_FRAME_LEN
        || !raw.starts_with(&VENDOR_HEADER)
        || raw.last() != Some(&SYSEX_END)
    {
        return Err(Error::MalformedMessage);
    }
    Ok(&raw[purpose.header().len()..raw.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_frame_bytes() {
        assert_eq!(
            frame(&IDENTITY_QUERY, Purpose::Query),
            [0xF0, 0x2C, 0x4E, 0x53, 0x01, 0xF7]
        );
        assert_eq!(
            frame(&CONFIG_QUERY, Purpose::Query),
            [0xF0, 0x2C, 0x4E, 0x53, 0x03, 0xF7]
        );
    }

    #[test]
    fn write_frame_inserts_command_byte() {
        let framed = frame(&[1, 2, 3], Purpose::Write);
        assert_eq!(framed, [0xF0, 0x2C, 0x4E, 0x53, 0x0F, 1, 2, 3, 0xF7]);
    }

    #[test]
    fn frame_unframe_round_trip() {
        let short = [0x42];
        let long: Vec<u8> = (1..=20).collect();
        for purpose in [Purpose::Query, Purpose::Write] {
            assert_eq!(unframe(&frame(&short, purpose), purpose).unwrap(), &short);
            assert_eq!(unframe(&frame(&long, purpose), purpose).unwrap(), &long[..]);
        }
    }

    #[test]
    fn unframe_accepts_response_with_command_echo() {
        // Identity response: vendor header, echo of 0x01, eight data bytes.
        let raw = [
            0xF0, 0x2C, 0x4E, 0x53, 0x01, 0x31, 0x32, 0x33, 0x34, 0x30, 0x31, 0x32, 0x33, 0xF7,
        ];
        let payload = unframe(&raw, Purpose::Write).unwrap();
        assert_eq!(payload, [0x31, 0x32, 0x33, 0x34, 0x30, 0x31, 0x32, 0x33]);
    }

    #[test]
    fn unframe_rejects_short_message() {
        assert!(matches!(
            unframe(&[0xF0, 0x2C, 0x4E, 0x53, 0xF7], Purpose::Query),
            Err(Error::MalformedMessage)
        ));
    }

    #[test]
    fn unframe_rejects_missing_terminator() {
        let mut raw = frame(&[0x03], Purpose::Query);
        *raw.last_mut().unwrap() = 0x00;
        assert!(matches!(
            unframe(&raw, Purpose::Query),
            Err(Error::MalformedMessage)
        ));
    }

    #[test]
    fn unframe_rejects_foreign_header() {
        let raw = [0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7];
        assert!(matches!(
            unframe(&raw, Purpose::Query),
            Err(Error::MalformedMessage)
        ));
    }
}
