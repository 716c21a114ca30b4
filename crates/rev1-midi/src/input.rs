//! Raw MIDI input parsing and the callback bridge
//!
//! The midir callback runs on the driver thread; it parses each frame into a
//! [`ControlMessage`] and forwards it through a bounded flume channel. The
//! application loop drains the channel and feeds messages to the controller
//! one at a time, which is what keeps dispatch strictly serial.

use crate::connection::{self, MidiConnectionError};
use flume::{Receiver, Sender};
use midir::MidiInputConnection;

/// One decoded short message from the device
///
/// The status byte is kept whole (class nibble + sub-channel) because the
/// control registry is keyed on it; note-off frames are normalized to the
/// note-on status with value 0 so press and release resolve to the same
/// logical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl ControlMessage {
    /// Parse a raw MIDI frame; `None` for anything but note and CC messages
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 3 {
            return None;
        }

        let status = data[0];
        match status & 0xF0 {
            // Note off: fold onto the note-on status with value 0
            0x80 => Some(Self {
                status: 0x90 | (status & 0x0F),
                data1: data[1],
                data2: 0,
            }),
            0x90 | 0xB0 => Some(Self {
                status,
                data1: data[1],
                data2: data[2],
            }),
            _ => None, // pitch bend, aftertouch, sysex replies
        }
    }
}

/// Owns the midir input connection and the receiving end of the bridge
pub struct InputBridge {
    /// Kept alive for the duration; dropping it closes the port
    _connection: MidiInputConnection<Sender<ControlMessage>>,
    rx: Receiver<ControlMessage>,
}

impl InputBridge {
    /// Connect to the first input port matching `port_match`
    pub fn connect(port_match: &str) -> Result<Self, MidiConnectionError> {
        let (midi_in, port) = connection::find_input_port(port_match)?;
        let (tx, rx) = flume::bounded(256);

        let conn = midi_in
            .connect(&port, "rev1-midi-input", Self::midi_callback, tx)
            .map_err(|e| MidiConnectionError::ConnectionError(e.to_string()))?;

        log::info!("MIDI: Input bridge connected");

        Ok(Self {
            _connection: conn,
            rx,
        })
    }

    /// The midir callback; must be fast and non-blocking
    fn midi_callback(_timestamp: u64, data: &[u8], tx: &mut Sender<ControlMessage>) {
        let Some(message) = ControlMessage::parse(data) else {
            return;
        };
        if tx.try_send(message).is_err() {
            log::warn!("MIDI: Message channel full, dropping message");
        }
    }

    /// Receive a pending message without blocking
    pub fn try_recv(&self) -> Option<ControlMessage> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending messages
    pub fn drain(&self) -> impl Iterator<Item = ControlMessage> + '_ {
        std::iter::from_fn(|| self.try_recv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let msg = ControlMessage::parse(&[0x97, 0x05, 0x7F]).unwrap();
        assert_eq!(
            msg,
            ControlMessage { status: 0x97, data1: 0x05, data2: 0x7F }
        );
    }

    #[test]
    fn test_parse_note_off_folds_to_note_on() {
        let msg = ControlMessage::parse(&[0x83, 0x58, 0x40]).unwrap();
        assert_eq!(msg, ControlMessage { status: 0x93, data1: 0x58, data2: 0 });
    }

    #[test]
    fn test_parse_control_change() {
        let msg = ControlMessage::parse(&[0xB1, 0x21, 0x41]).unwrap();
        assert_eq!(
            msg,
            ControlMessage { status: 0xB1, data1: 0x21, data2: 0x41 }
        );
    }

    #[test]
    fn test_parse_special_channel() {
        // The reserved special class is a note-on status and must survive intact
        let msg = ControlMessage::parse(&[0x9F, 0x00, 0x7F]).unwrap();
        assert_eq!(msg.status, 0x9F);
    }

    #[test]
    fn test_parse_rejects_other_classes() {
        assert_eq!(ControlMessage::parse(&[0xE0, 0x00, 0x40]), None);
        assert_eq!(ControlMessage::parse(&[0xA0, 0x10, 0x20]), None);
        assert_eq!(ControlMessage::parse(&[0x90, 0x10]), None);
    }
}
