//! MIDI transport underneath the protocol session.
//!
//! The protocol layers consume the [`SysexTransport`] trait: an opaque duplex
//! channel that can send a complete message and poll for a received one.
//! [`MidirTransport`] is the real implementation on top of [`midir`], opening
//! the first input/output port pair whose names contain the device's port
//! name fragment.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::error::Error;

/// Client name handed to the MIDI backend.
const CLIENT_NAME: &str = "nanosync-midi";

/// Fragment found in the port names the Nanosyncs registers with the host.
pub const DEVICE_PORT_FRAGMENT: &str = "NANOSYNCS";

/// Raw duplex message channel to the device.
///
/// Implementations own both directions of the channel. `send` expects a fully
/// framed message and `try_receive` must never block; the bounded-retry
/// polling above this trait is the protocol's only flow control.
pub trait SysexTransport {
    /// Send one complete message to the device.
    ///
    /// No acknowledgement is expected at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortClosed`] after [`SysexTransport::close`], or a
    /// backend error if the write fails.
    fn send(&mut self, message: &[u8]) -> Result<(), Error>;

    /// Poll for one received message without blocking.
    ///
    /// Returns `Ok(None)` when nothing is waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortClosed`] after [`SysexTransport::close`].
    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, Error>;

    /// Release both channel directions. Idempotent.
    fn close(&mut self);
}

/// Names of the MIDI ports visible to the host.
///
/// Returned by [`list_ports`] so callers can see what is available when the
/// device cannot be found.
#[derive(Debug, Default)]
pub struct PortList {
    /// Input port names, in backend order.
    pub inputs: Vec<String>,
    /// Output port names, in backend order.
    pub outputs: Vec<String>,
}

/// Enumerate the MIDI ports currently visible to the host.
///
/// # Errors
///
/// Returns an error if the MIDI backend cannot be initialised.
pub fn list_ports() -> Result<PortList, Error> {
    let input = MidiInput::new(CLIENT_NAME)?;
    let output = MidiOutput::new(CLIENT_NAME)?;
    let mut ports = PortList::default();
    for port in input.ports() {
        ports.inputs.push(input.port_name(&port)?);
    }
    for port in output.ports() {
        ports.outputs.push(output.port_name(&port)?);
    }
    Ok(ports)
}

/// Duplex sysex channel over a [`midir`] input/output port pair.
///
/// Received messages are forwarded from the input callback into an in-process
/// channel, so [`SysexTransport::try_receive`] is a non-blocking poll of that
/// channel. The backend connections are released on [`SysexTransport::close`]
/// or drop.
pub struct MidirTransport {
    output: Option<MidiOutputConnection>,
    input: Option<MidiInputConnection<Sender<Vec<u8>>>>,
    incoming: Receiver<Vec<u8>>,
}

impl MidirTransport {
    /// Open the first input/output port pair whose names contain `fragment`.
    ///
    /// The match is a case-sensitive substring match, the way the device's
    /// port names (`NANOSYNCS ...`) are found among whatever else the host
    /// exposes. Port order differs between hosts, so matching by name is the
    /// only reliable selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortNotFound`] if no input or no output port name
    /// contains the fragment, or a backend error if the ports cannot be
    /// opened.
    pub fn open_matching(fragment: &str) -> Result<Self, Error> {
        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        // Sysex messages are filtered out by default.
        midi_in.ignore(Ignore::None);
        let midi_out = MidiOutput::new(CLIENT_NAME)?;

        let in_port = midi_in
            .ports()
            .into_iter()
            .find(|p| {
                midi_in
                    .port_name(p)
                    .is_ok_and(|name| name.contains(fragment))
            })
            .ok_or_else(|| Error::PortNotFound(fragment.to_owned()))?;
        let out_port = midi_out
            .ports()
            .into_iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .is_ok_and(|name| name.contains(fragment))
            })
            .ok_or_else(|| Error::PortNotFound(fragment.to_owned()))?;

        let (tx, rx) = channel();
        let input = midi_in.connect(
            &in_port,
            CLIENT_NAME,
            |_timestamp, message, tx| {
                // A send only fails once the receiving half is gone, at which
                // point the message has nowhere to go anyway.
                let _ = tx.send(message.to_vec());
            },
            tx,
        )?;
        let output = midi_out.connect(&out_port, CLIENT_NAME)?;

        log::debug!("opened MIDI port pair matching {fragment:?}");
        Ok(Self {
            output: Some(output),
            input: Some(input),
            incoming: rx,
        })
    }
}

impl SysexTransport for MidirTransport {
    fn send(&mut self, message: &[u8]) -> Result<(), Error> {
        let output = self.output.as_mut().ok_or(Error::PortClosed)?;
        output.send(message)?;
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.input.is_none() {
            return Err(Error::PortClosed);
        }
        match self.incoming.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            // The input connection still exists, so a disconnected channel
            // means the backend tore the port down underneath us.
            Err(TryRecvError::Disconnected) => Err(Error::PortClosed),
        }
    }

    fn close(&mut self) {
        if let Some(output) = self.output.take() {
            output.close();
        }
        if let Some(input) = self.input.take() {
            input.close();
        }
    }
}
