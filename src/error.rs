use std::fmt;

/// Wrapper for problems when communicating with the Nanosyncs.
#[derive(Debug)]
pub enum Error {
    /// A received sysex message could not be unframed or decoded.
    ///
    /// The message was shorter than the minimum frame length, did not end
    /// with the end-of-exclusive terminator, did not carry the Nanosyncs
    /// vendor header, or its interior payload had the wrong shape for the
    /// exchange in progress. Fatal to the current operation; never retried.
    MalformedMessage,
    /// The receive retry budget was exhausted without any message arriving.
    ///
    /// The Nanosyncs sends no acknowledgements, so silence after the retry
    /// budget is the only failure signal the protocol offers. The caller may
    /// retry the whole operation.
    NoResponse,
    /// Session establishment failed because the device never answered the
    /// serial-number query.
    ///
    /// No partial session is exposed when this is returned.
    HandshakeFailed,
    /// The given label is not part of the field's enumeration.
    ///
    /// Caller input error, raised before any device I/O takes place.
    UnknownLabel {
        /// Name of the field the lookup was attempted on.
        field: &'static str,
        /// The label that was not recognised.
        label: String,
    },
    /// A field index outside the configuration block was used.
    ///
    /// The enclosed `usize` is the offending index; valid indices are 0–19.
    FieldIndexOutOfRange(usize),
    /// A configuration payload did not contain exactly 20 bytes.
    ///
    /// The enclosed `usize` is the length that was received.
    InvalidLength(usize),
    /// The FPS code read from the device has no entry in the refresh-rate
    /// table.
    ///
    /// This guards against future device enumeration values this crate does
    /// not yet model. The enclosed `u8` is the unrecognised FPS code.
    UnsupportedRate(u8),
    /// No MIDI port name contained the requested fragment.
    ///
    /// The enclosed `String` is the fragment that was searched for. Use
    /// [`transport::list_ports`](crate::transport::list_ports) to see what
    /// the host can see.
    PortNotFound(String),
    /// The transport has already been closed.
    PortClosed,
    /// An error occurred in the underlying MIDI backend.
    Midi(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedMessage => write!(f, "malformed sysex message from the device"),
            Error::NoResponse => write!(f, "no response from the device within the retry budget"),
            Error::HandshakeFailed => write!(f, "device did not answer the serial-number query"),
            Error::UnknownLabel { field, label } => {
                write!(f, "label {label:?} is not valid for field {field:?}")
            }
            Error::FieldIndexOutOfRange(index) => {
                write!(f, "field index {index} is outside the configuration block")
            }
            Error::InvalidLength(len) => {
                write!(f, "configuration payload was {len} bytes, expected 20")
            }
            Error::UnsupportedRate(code) => {
                write!(f, "FPS code {code} has no refresh-rate table entry")
            }
            Error::PortNotFound(fragment) => {
                write!(f, "no MIDI port name contains {fragment:?}")
            }
            Error::PortClosed => write!(f, "the MIDI transport has been closed"),
            Error::Midi(message) => write!(f, "MIDI backend error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

#[doc(hidden)]
impl From<midir::InitError> for Error {
    fn from(value: midir::InitError) -> Self {
        Self::Midi(value.to_string())
    }
}

#[doc(hidden)]
impl From<midir::PortInfoError> for Error {
    fn from(value: midir::PortInfoError) -> Self {
        Self::Midi(value.to_string())
    }
}

#[doc(hidden)]
impl From<midir::SendError> for Error {
    fn from(value: midir::SendError) -> Self {
        Self::Midi(value.to_string())
    }
}

#[doc(hidden)]
impl<T> From<midir::ConnectError<T>> for Error {
    fn from(value: midir::ConnectError<T>) -> Self {
        Self::Midi(value.to_string())
    }
}
