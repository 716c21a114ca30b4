//! MIDI port discovery and the outgoing transport
//!
//! Uses midir for cross-platform MIDI I/O (ALSA on Linux, CoreMIDI on macOS,
//! WinMM on Windows). Port matching is a case-insensitive substring test
//! against the port name, so "DDJ-REV1" finds the device regardless of the
//! OS-specific prefix.

use crate::engine::MidiSender;
use midir::{MidiInput, MidiInputPort, MidiOutput, MidiOutputConnection};

/// Error type for MIDI connection operations
#[derive(Debug, thiserror::Error)]
pub enum MidiConnectionError {
    #[error("Failed to initialize MIDI input: {0}")]
    InputInitError(String),

    #[error("Failed to initialize MIDI output: {0}")]
    OutputInitError(String),

    #[error("No MIDI input ports available")]
    NoInputPorts,

    #[error("No MIDI port found matching pattern: {0}")]
    PortNotFound(String),

    #[error("Failed to connect to MIDI port: {0}")]
    ConnectionError(String),

    #[error("Failed to get port info: {0}")]
    PortInfoError(String),
}

/// Find the input port matching `port_match`, returning the `MidiInput` so
/// the caller can attach its callback
pub fn find_input_port(
    port_match: &str,
) -> Result<(MidiInput, MidiInputPort), MidiConnectionError> {
    let pattern = port_match.to_lowercase();

    let midi_in = MidiInput::new("rev1-midi-in")
        .map_err(|e| MidiConnectionError::InputInitError(e.to_string()))?;

    let in_ports = midi_in.ports();
    if in_ports.is_empty() {
        return Err(MidiConnectionError::NoInputPorts);
    }

    let port = in_ports
        .into_iter()
        .find(|port| {
            midi_in
                .port_name(port)
                .map(|name| name.to_lowercase().contains(&pattern))
                .unwrap_or(false)
        })
        .ok_or_else(|| MidiConnectionError::PortNotFound(port_match.to_string()))?;

    let port_name = midi_in
        .port_name(&port)
        .map_err(|e| MidiConnectionError::PortInfoError(e.to_string()))?;
    log::info!("MIDI: Found input port: {}", port_name);

    Ok((midi_in, port))
}

/// Connect to the output port matching `port_match`
pub fn connect_output(port_match: &str) -> Result<MidirSender, MidiConnectionError> {
    let pattern = port_match.to_lowercase();

    let midi_out = MidiOutput::new("rev1-midi-out")
        .map_err(|e| MidiConnectionError::OutputInitError(e.to_string()))?;

    let port = midi_out
        .ports()
        .into_iter()
        .find(|port| {
            midi_out
                .port_name(port)
                .map(|name| name.to_lowercase().contains(&pattern))
                .unwrap_or(false)
        })
        .ok_or_else(|| MidiConnectionError::PortNotFound(port_match.to_string()))?;

    let port_name = midi_out
        .port_name(&port)
        .map_err(|e| MidiConnectionError::PortInfoError(e.to_string()))?;
    log::info!("MIDI: Found output port: {}", port_name);

    let conn = midi_out
        .connect(&port, "rev1-midi-output")
        .map_err(|e| MidiConnectionError::ConnectionError(e.to_string()))?;

    Ok(MidirSender { connection: conn })
}

/// List all available MIDI input port names
pub fn list_input_ports() -> Result<Vec<String>, MidiConnectionError> {
    let midi_in = MidiInput::new("rev1-midi-list")
        .map_err(|e| MidiConnectionError::InputInitError(e.to_string()))?;

    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}

/// Outgoing transport over a midir connection
///
/// Writes are fire-and-forget: a failed send is logged and dropped, matching
/// the mapping core's no-fatal-path contract.
pub struct MidirSender {
    connection: MidiOutputConnection,
}

impl MidiSender for MidirSender {
    fn send(&mut self, status: u8, data1: u8, data2: u8) {
        log::trace!("[MIDI OUT] {:02X} {:02X} {:02X}", status, data1, data2);
        if let Err(e) = self.connection.send(&[status, data1, data2]) {
            log::warn!("MIDI output: Failed to send message: {}", e);
        }
    }

    fn send_sysex(&mut self, data: &[u8]) {
        log::debug!("[MIDI OUT] sysex {} bytes", data.len());
        if let Err(e) = self.connection.send(data) {
            log::warn!("MIDI output: Failed to send sysex: {}", e);
        }
    }
}
