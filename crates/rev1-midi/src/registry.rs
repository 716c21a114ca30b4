//! Static control registry
//!
//! Maps each `(status byte, address)` pair the hardware can emit to a logical
//! control identity. The table is closed: pairs not registered here are
//! silently dropped by the dispatcher, never an error.
//!
//! Addressing follows the REV1's MIDI chart. Status bytes combine a message
//! class nibble with a sub-channel: note-on `0x90 + sub`, control change
//! `0xB0 + sub`, plus the reserved `0x9F` special class. Pads pressed while
//! shift is held arrive on a separate sub-channel one above the deck's normal
//! pad sub-channel, so shifted pads are distinct registry entries rather than
//! a runtime modifier. Only browse and deck-select consult the global shift
//! flag — the hardware exposes no shifted channel for those.

use crate::types::{DECK_COUNT, PAD_COUNT};
use std::collections::HashMap;

/// Status byte classes and sub-channel offsets
pub mod chan {
    /// Note-on class
    pub const NOTE: u8 = 0x90;
    /// Control-change class
    pub const CONTROL: u8 = 0xB0;
    /// Reserved channel for the track-loaded animation
    pub const SPECIAL: u8 = 0x9F;

    /// Mixing channel sub-channels (ch1 = 0x00 .. ch4 = 0x03)
    pub const CH1: u8 = 0x00;
    /// First effect unit
    pub const FX1: u8 = 0x04;
    /// Second effect unit
    pub const FX2: u8 = 0x05;
    /// Browser section
    pub const BROWSER: u8 = 0x06;
    /// First deck's pad sub-channel; shift layer is one above, decks
    /// alternate (deck1 = 0x07, deck1-shift = 0x08, deck2 = 0x09, ...)
    pub const DECK1: u8 = 0x07;
    /// Last pad sub-channel (deck4 shift layer)
    pub const DECK4_SHIFT: u8 = 0x0E;
}

/// Pad sub-channel for a 1-based deck number
pub fn deck_pad_channel(deck: u8) -> u8 {
    chan::DECK1 + (deck - 1) * 2
}

/// What a physical control does, before value transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    HotcuePad,
    HotcuePadShift,
    SamplerPad,
    SamplerPadShift,
    TempoSliderMsb,
    TempoSliderLsb,
    JogTurn,
    JogSearch,
    JogTouch,
    Sync,
    SyncShift,
    Shift,
    Browse,
    DeckSelect,
}

/// Resolved identity of a physical control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalControl {
    /// Owning deck (1-4); 0 for deckless controls (browse)
    pub deck: u8,
    pub kind: ControlKind,
}

// Button addresses on the mixing-channel note sub-channels
const ADDR_JOG_TOUCH: u8 = 0x36;
const ADDR_SHIFT: u8 = 0x3F;
const ADDR_SYNC: u8 = 0x58;
const ADDR_SYNC_SHIFT: u8 = 0x5C;
const ADDR_DECK_SELECT: u8 = 0x72;

// Continuous controls on the mixing-channel CC sub-channels
const ADDR_TEMPO_MSB: u8 = 0x00;
const ADDR_TEMPO_LSB: u8 = 0x20;
const ADDR_JOG_TURN: u8 = 0x21;
const ADDR_JOG_SEARCH: u8 = 0x26;

// Browser section
const ADDR_BROWSE_PRESS: u8 = 0x41;

// Pad mode base addresses (address = mode | pad index)
const PAD_MODE_HOTCUE: u8 = 0x00;
const PAD_MODE_SAMPLER: u8 = 0x30;

/// The closed control table
pub struct ControlRegistry {
    map: HashMap<(u8, u8), LogicalControl>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        let mut map = HashMap::new();

        let mut add = |status: u8, address: u8, deck: u8, kind: ControlKind| {
            map.insert((status, address), LogicalControl { deck, kind });
        };

        for deck in 1..=DECK_COUNT {
            let ch = chan::CH1 + (deck - 1);

            // Buttons on the mixing channel
            add(chan::NOTE + ch, ADDR_SHIFT, deck, ControlKind::Shift);
            add(chan::NOTE + ch, ADDR_SYNC, deck, ControlKind::Sync);
            add(chan::NOTE + ch, ADDR_SYNC_SHIFT, deck, ControlKind::SyncShift);
            add(chan::NOTE + ch, ADDR_DECK_SELECT, deck, ControlKind::DeckSelect);
            add(chan::NOTE + ch, ADDR_JOG_TOUCH, deck, ControlKind::JogTouch);

            // Continuous controls on the mixing channel
            add(chan::CONTROL + ch, ADDR_TEMPO_MSB, deck, ControlKind::TempoSliderMsb);
            add(chan::CONTROL + ch, ADDR_TEMPO_LSB, deck, ControlKind::TempoSliderLsb);
            add(chan::CONTROL + ch, ADDR_JOG_TURN, deck, ControlKind::JogTurn);
            add(chan::CONTROL + ch, ADDR_JOG_SEARCH, deck, ControlKind::JogSearch);

            // Performance pads: normal and shift layers are separate channels
            let pads = chan::NOTE + deck_pad_channel(deck);
            let pads_shift = pads + 1;
            for pad in 0..PAD_COUNT {
                add(pads, PAD_MODE_HOTCUE | pad, deck, ControlKind::HotcuePad);
                add(pads_shift, PAD_MODE_HOTCUE | pad, deck, ControlKind::HotcuePadShift);
                add(pads, PAD_MODE_SAMPLER | pad, deck, ControlKind::SamplerPad);
                add(pads_shift, PAD_MODE_SAMPLER | pad, deck, ControlKind::SamplerPadShift);
            }
        }

        add(chan::NOTE + chan::BROWSER, ADDR_BROWSE_PRESS, 0, ControlKind::Browse);

        Self { map }
    }

    /// Resolve a raw (status, address) pair; `None` for unmapped controls
    pub fn lookup(&self, status: u8, address: u8) -> Option<LogicalControl> {
        self.map.get(&(status, address)).copied()
    }

    /// Number of registered controls
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pair_not_dispatched() {
        let registry = ControlRegistry::new();
        assert_eq!(registry.lookup(0x90, 0x7E), None);
        assert_eq!(registry.lookup(0xB4, ADDR_TEMPO_MSB), None);
    }

    #[test]
    fn test_deck_buttons() {
        let registry = ControlRegistry::new();

        let sync = registry.lookup(0x92, ADDR_SYNC).unwrap();
        assert_eq!(sync.deck, 3);
        assert_eq!(sync.kind, ControlKind::Sync);

        let shift = registry.lookup(0x90, ADDR_SHIFT).unwrap();
        assert_eq!(shift.kind, ControlKind::Shift);
    }

    #[test]
    fn test_tempo_slider_pair() {
        let registry = ControlRegistry::new();

        let msb = registry.lookup(0xB1, ADDR_TEMPO_MSB).unwrap();
        let lsb = registry.lookup(0xB1, ADDR_TEMPO_LSB).unwrap();
        assert_eq!(msb.deck, 2);
        assert_eq!(msb.kind, ControlKind::TempoSliderMsb);
        assert_eq!(lsb.deck, 2);
        assert_eq!(lsb.kind, ControlKind::TempoSliderLsb);
    }

    #[test]
    fn test_shift_layer_is_distinct_control() {
        let registry = ControlRegistry::new();

        // Deck 1 pads: normal layer on 0x97, shift layer on 0x98
        let pad = registry.lookup(0x97, 0x03).unwrap();
        let shifted = registry.lookup(0x98, 0x03).unwrap();
        assert_eq!(pad.kind, ControlKind::HotcuePad);
        assert_eq!(shifted.kind, ControlKind::HotcuePadShift);
        assert_eq!(pad.deck, 1);
        assert_eq!(shifted.deck, 1);
    }

    #[test]
    fn test_sampler_pads_all_decks() {
        let registry = ControlRegistry::new();

        for deck in 1..=4u8 {
            let status = chan::NOTE + deck_pad_channel(deck);
            for pad in 0..8u8 {
                let control = registry.lookup(status, 0x30 | pad).unwrap();
                assert_eq!(control.deck, deck);
                assert_eq!(control.kind, ControlKind::SamplerPad);
            }
        }
    }

    #[test]
    fn test_browse() {
        let registry = ControlRegistry::new();
        let browse = registry.lookup(0x96, ADDR_BROWSE_PRESS).unwrap();
        assert_eq!(browse.kind, ControlKind::Browse);
    }
}
