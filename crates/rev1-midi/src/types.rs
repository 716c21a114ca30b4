//! Engine group and parameter identities
//!
//! The host engine addresses state with string keys (`deck-1`,
//! `effect-rack-1-unit-2-effect-3`, `sampler-9`). Inside the mapping those are
//! closed enums so dispatch never matches on strings; the string form is the
//! `Display` rendering, used at the host boundary and in logs.

use std::fmt;

/// Number of mixing channels / physical decks
pub const DECK_COUNT: u8 = 4;
/// Physical performance pads per deck side
pub const PAD_COUNT: u8 = 8;
/// Sampler slots the mapping drives (two banks of eight)
pub const SAMPLER_COUNT: u8 = 16;

/// A state-holding group on the host engine
///
/// Deck, sampler, and effect indices are 1-based, matching the engine's
/// own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Mixing channel / deck (1-4)
    Deck(u8),
    /// Effect unit as a whole (1-2), used for focus and takeover setup
    EffectUnit(u8),
    /// One effect slot inside a unit (unit 1-2, effect 1-3)
    EffectSlot { unit: u8, effect: u8 },
    /// Sampler slot (1-16)
    Sampler(u8),
    /// The track-preview deck
    PreviewDeck,
    /// Application-wide settings (sampler bank size)
    App,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deck(n) => write!(f, "deck-{}", n),
            Self::EffectUnit(u) => write!(f, "effect-rack-1-unit-{}", u),
            Self::EffectSlot { unit, effect } => {
                write!(f, "effect-rack-1-unit-{}-effect-{}", unit, effect)
            }
            Self::Sampler(n) => write!(f, "sampler-{}", n),
            Self::PreviewDeck => write!(f, "preview-deck"),
            Self::App => write!(f, "app"),
        }
    }
}

/// A named parameter or action on an engine group
///
/// The `Display` form is the engine's parameter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    // Per-deck state we subscribe to
    VuMeter,
    TrackLoaded,
    LoopEnabled,

    // Per-deck state we write
    Rate,
    RateRange,
    Jog,

    // Transport and sync
    Play,
    Stop,
    SyncEnabled,
    Beatsync,

    // Hot cues (1-based pad number)
    HotcueActivate(u8),
    HotcueClear(u8),

    // Sampler slot actions
    CueGotoAndPlay,
    CueGotoAndStop,
    LoadSelectedTrack,
    LoadSelectedTrackAndPlay,
    Eject,

    // Effect slot state
    Enabled,
    Meta,
    ShowFocus,

    // App settings
    NumSamplers,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VuMeter => write!(f, "vu_meter"),
            Self::TrackLoaded => write!(f, "track_loaded"),
            Self::LoopEnabled => write!(f, "loop_enabled"),
            Self::Rate => write!(f, "rate"),
            Self::RateRange => write!(f, "rateRange"),
            Self::Jog => write!(f, "jog"),
            Self::Play => write!(f, "play"),
            Self::Stop => write!(f, "stop"),
            Self::SyncEnabled => write!(f, "sync_enabled"),
            Self::Beatsync => write!(f, "beatsync"),
            Self::HotcueActivate(n) => write!(f, "hotcue_{}_activate", n),
            Self::HotcueClear(n) => write!(f, "hotcue_{}_clear", n),
            Self::CueGotoAndPlay => write!(f, "cue_gotoandplay"),
            Self::CueGotoAndStop => write!(f, "cue_gotoandstop"),
            Self::LoadSelectedTrack => write!(f, "LoadSelectedTrack"),
            Self::LoadSelectedTrackAndPlay => write!(f, "LoadSelectedTrackAndPlay"),
            Self::Eject => write!(f, "eject"),
            Self::Enabled => write!(f, "enabled"),
            Self::Meta => write!(f, "meta"),
            Self::ShowFocus => write!(f, "show_focus"),
            Self::NumSamplers => write!(f, "num_samplers"),
        }
    }
}
