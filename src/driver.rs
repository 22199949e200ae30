//! Driver for the Nanosyncs configuration protocol.

use crate::catalog::{self, field};
use crate::config::DeviceConfig;
use crate::error::Error;
use crate::rate::{self, RefreshRate};
use crate::session::{DeviceIdentity, Session};
use crate::sysex::{self, Purpose};
use crate::transport::{DEVICE_PORT_FRAGMENT, MidirTransport, SysexTransport};

/// Maximum number of write-verify rounds before giving up on a change.
pub const APPLY_ATTEMPTS: usize = 5;

/// Result of applying a configuration to the device.
///
/// The device never acknowledges a write, so the driver re-reads the
/// configuration and compares. A device already holding the target values
/// produces a "no observed change" signal indistinguishable from a dropped
/// write, which is why [`ApplyOutcome::Uncertain`] is a value rather than an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A re-read confirmed the device holds the new configuration.
    Applied,
    /// The device already held the requested configuration; no write frame
    /// was sent.
    NoChangeNeeded,
    /// No change was observed after all write attempts.
    ///
    /// Either every write was dropped, or the block being written never
    /// differed from what a concurrent front-panel change had already set.
    /// The caller decides whether to re-attempt, accept, or query further.
    Uncertain,
}

/// Driver for the Nanosyncs.
///
/// Owns the [`Session`] and a cached copy of the most recently read
/// configuration. Every read that fully decodes refreshes the cache; nothing
/// else mutates it, so a failed exchange never leaves it half-updated.
#[derive(Debug)]
pub struct NanoSync<T: SysexTransport> {
    session: Session<T>,
    current: DeviceConfig,
}

impl NanoSync<MidirTransport> {
    /// Connect to the first MIDI port pair whose names contain `NANOSYNCS`.
    ///
    /// Performs the serial-number handshake and reads the initial
    /// configuration, so the driver is fully populated on return.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortNotFound`] if the device's ports are absent,
    /// [`Error::HandshakeFailed`] if it does not answer the serial-number
    /// query, or any error from the initial configuration read.
    pub fn connect() -> Result<Self, Error> {
        Self::connect_matching(DEVICE_PORT_FRAGMENT)
    }

    /// Connect to the first MIDI port pair whose names contain `fragment`.
    ///
    /// Use this constructor if your MIDI patchbay renames the device's ports.
    ///
    /// # Errors
    ///
    /// As for [`NanoSync::connect`].
    pub fn connect_matching(fragment: &str) -> Result<Self, Error> {
        Self::with_transport(MidirTransport::open_matching(fragment)?)
    }
}

impl<T: SysexTransport> NanoSync<T> {
    /// Build a driver over an already-open transport.
    ///
    /// Performs the same handshake and initial configuration read as
    /// [`NanoSync::connect`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandshakeFailed`] if the device does not answer the
    /// serial-number query, or any error from the initial configuration read.
    pub fn with_transport(transport: T) -> Result<Self, Error> {
        let mut session = Session::establish(transport)?;
        let current = query_config(&mut session)?;
        Ok(Self { session, current })
    }

    /// The identity captured during the connect handshake.
    pub fn identity(&self) -> &DeviceIdentity {
        self.session.identity()
    }

    /// The most recently read configuration, without device I/O.
    pub fn current(&self) -> DeviceConfig {
        self.current
    }

    /// Read the configuration from the device and refresh the cache.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::NoResponse`] from the bounded receive and
    /// [`Error::MalformedMessage`] / [`Error::InvalidLength`] from decoding.
    /// The cache keeps its previous value on error.
    pub fn read_current(&mut self) -> Result<DeviceConfig, Error> {
        let config = query_config(&mut self.session)?;
        self.current = config;
        Ok(config)
    }

    /// Apply a configuration to the device, verifying by re-read.
    ///
    /// If a fresh read shows the device already holds `new`, no write frame
    /// is sent and the result is [`ApplyOutcome::NoChangeNeeded`]. Otherwise
    /// the block is written and re-read up to [`APPLY_ATTEMPTS`] times; the
    /// first matching re-read returns [`ApplyOutcome::Applied`], and
    /// exhausting the attempts returns [`ApplyOutcome::Uncertain`].
    ///
    /// # Errors
    ///
    /// Propagates transport and decode errors from the sends and re-reads.
    pub fn apply(&mut self, new: DeviceConfig) -> Result<ApplyOutcome, Error> {
        if self.read_current()? == new {
            log::debug!("device already holds the requested configuration");
            return Ok(ApplyOutcome::NoChangeNeeded);
        }
        for attempt in 1..=APPLY_ATTEMPTS {
            self.session
                .send(&sysex::frame(&new.encode(), Purpose::Write))?;
            if self.read_current()? == new {
                log::debug!("configuration change confirmed on attempt {attempt}");
                return Ok(ApplyOutcome::Applied);
            }
        }
        log::warn!("no observed configuration change after {APPLY_ATTEMPTS} write attempts");
        Ok(ApplyOutcome::Uncertain)
    }

    /// Change a single field to the value named by `label`.
    ///
    /// Looks the label up in the [catalog](crate::catalog), builds a new
    /// snapshot from the cached configuration with that one field replaced,
    /// and delegates to [`NanoSync::apply`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLabel`] or [`Error::FieldIndexOutOfRange`]
    /// before any device I/O, then propagates errors from `apply`.
    pub fn set_field_by_label(&mut self, index: usize, label: &str) -> Result<ApplyOutcome, Error> {
        let raw = catalog::field_def(index)?.value_for(label)?;
        let new = self.current.with_field(index, raw)?;
        self.apply(new)
    }

    /// Re-read the configuration and render each field for display.
    ///
    /// The cursor placeholder is skipped. Raw codes outside a field's known
    /// enumeration are rendered numerically rather than failing, since the
    /// device may report values this crate does not model.
    ///
    /// # Errors
    ///
    /// Propagates errors from the configuration read.
    pub fn describe_current(&mut self) -> Result<Vec<(&'static str, String)>, Error> {
        let current = self.read_current()?;
        let mut described = Vec::with_capacity(catalog::CATALOG.len() - 1);
        for (index, def) in catalog::CATALOG.iter().enumerate() {
            if def.passthrough {
                continue;
            }
            let raw = current.field(index)?;
            let rendered = match def.label_for(raw) {
                Some(label) => label.to_owned(),
                None => raw.to_string(),
            };
            described.push((def.name, rendered));
        }
        Ok(described)
    }

    /// Derive the current output refresh rate as an exact fraction.
    ///
    /// Combines the FPS field with the HD-standard field (the two `×2 fps`
    /// standards double the nominal rate), e.g. 29.97 fps → `30000/1001`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRate`] if the device reports an FPS code
    /// with no table entry, and propagates errors from the configuration
    /// read.
    pub fn refresh_rate(&mut self) -> Result<RefreshRate, Error> {
        let current = self.read_current()?;
        rate::refresh_rate(
            current.field(field::FPS)?,
            current.field(field::HD_STANDARD)?,
        )
    }

    /// Close the underlying transport. Idempotent.
    pub fn close(&mut self) {
        self.session.close();
    }
}

fn query_config<T: SysexTransport>(session: &mut Session<T>) -> Result<DeviceConfig, Error> {
    session.send(&sysex::frame(&sysex::CONFIG_QUERY, Purpose::Query))?;
    let response = session.receive_with_retry()?;
    DeviceConfig::decode(sysex::unframe(&response, Purpose::Write)?)
}
