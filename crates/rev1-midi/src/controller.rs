//! Engine binding and lifecycle
//!
//! `Rev1Controller` is the dispatch root: inbound messages resolve through
//! the registry, run through the value transforms, and land on the engine;
//! engine change notifications come back through [`Rev1Controller::on_engine_change`]
//! and drive the lights and blink timers. All entry points are called from
//! one thread, one event at a time — handlers never suspend, so the plain
//! mutable session fields are safe without locking.

use crate::blink::BlinkController;
use crate::engine::{MidiSender, MixEngine, Scheduler, TimerId};
use crate::input::ControlMessage;
use crate::lights::{self, ON};
use crate::registry::{chan, deck_pad_channel, ControlKind, ControlRegistry, LogicalControl};
use crate::transform;
use crate::types::{Group, Param, DECK_COUNT, PAD_COUNT, SAMPLER_COUNT};

/// Startup handshake querying the device for current control positions
pub const POSITION_QUERY: [u8; 12] = [
    0xF0, 0x00, 0x40, 0x05, 0x00, 0x00, 0x02, 0x06, 0x00, 0x03, 0x01, 0xF7,
];

/// Pad mode ranges the shutdown sweep can skip — never illuminated by this
/// mapping (an optimization, not a correctness requirement)
const UNUSED_PAD_MODES: [u8; 3] = [0x20, 0x60, 0x70];

/// Mutable session context, owned by the controller
///
/// Single-writer by construction: only serial dispatch touches it.
struct Session {
    /// True while any shift button is held
    shift_held: bool,
    /// Set when the browse button started preview playback; reserved for
    /// preview seek handling, not read anywhere else in this mapping
    preview_seek_enabled: bool,
    /// Jog touch starts a scratch session only while this is on
    vinyl_mode: bool,
    /// Most recent tempo-slider MSB fragment per deck; 0 until the first
    /// MSB arrives, so a stray LSB resolves against a defined value
    high_res_msb: [u8; DECK_COUNT as usize],
}

impl Session {
    fn new() -> Self {
        Self {
            shift_held: false,
            preview_seek_enabled: false,
            vinyl_mode: true,
            high_res_msb: [0; DECK_COUNT as usize],
        }
    }
}

/// The DDJ-REV1 mapping
pub struct Rev1Controller<E, M, S> {
    engine: E,
    out: M,
    scheduler: S,
    registry: ControlRegistry,
    blink: BlinkController,
    session: Session,
}

impl<E: MixEngine, M: MidiSender, S: Scheduler> Rev1Controller<E, M, S> {
    pub fn new(engine: E, out: M, scheduler: S) -> Self {
        Self {
            engine,
            out,
            scheduler,
            registry: ControlRegistry::new(),
            blink: BlinkController::new(),
            session: Session::new(),
        }
    }

    /// Establish subscriptions, set every light to a known state, and query
    /// the device for current control positions
    pub fn startup(&mut self) {
        log::info!("REV1: startup");

        self.engine.set(Group::EffectUnit(1), Param::ShowFocus, 1.0);

        for deck in 1..=DECK_COUNT {
            let group = Group::Deck(deck);
            let channel = deck - 1;

            self.engine.subscribe(group, Param::VuMeter);
            lights::set_vu_meter(&mut self.out, channel, 0.0);

            self.engine.soft_takeover(group, Param::Rate);

            self.engine.subscribe(group, Param::TrackLoaded);
            // One-shot "track loaded" animation on the special channel
            self.out.send(chan::SPECIAL, channel, ON);

            self.engine.subscribe(group, Param::LoopEnabled);
        }

        for unit in 1..=2 {
            for effect in 1..=3 {
                let group = Group::EffectSlot { unit, effect };
                self.engine.soft_takeover(group, Param::Meta);
                self.engine.subscribe(group, Param::Enabled);
            }
        }

        if self.engine.get(Group::App, Param::NumSamplers) < f64::from(SAMPLER_COUNT) {
            self.engine
                .set(Group::App, Param::NumSamplers, f64::from(SAMPLER_COUNT));
        }
        for sampler in 1..=SAMPLER_COUNT {
            self.engine.subscribe(Group::Sampler(sampler), Param::Play);
        }

        self.out.send_sysex(&POSITION_QUERY);
    }

    /// Force every light this mapping can have lit back off
    pub fn shutdown(&mut self) {
        log::info!("REV1: shutdown");

        self.blink.stop_all(&mut self.scheduler);

        for channel in 0..DECK_COUNT {
            lights::set_vu_meter(&mut self.out, channel, 0.0);
            lights::set_reloop_light(&mut self.out, channel, false);
        }

        // Sweep all pad-mode address ranges across every deck sub-channel,
        // normal and shift layers alike
        for mode in (0x00u8..0x80).step_by(0x10) {
            if UNUSED_PAD_MODES.contains(&mode) {
                continue;
            }
            for pad in 0..PAD_COUNT {
                for sub in chan::DECK1..=chan::DECK4_SHIFT {
                    lights::set_indicator(&mut self.out, chan::NOTE + sub, mode + pad, false);
                }
            }
        }

        for unit in 1..=2 {
            for slot in 1..=3 {
                lights::set_fx_light(&mut self.out, unit, slot, false);
            }
        }
    }

    /// Dispatch one inbound control message
    ///
    /// Unknown (status, address) pairs are dropped; the registry is
    /// intentionally partial.
    pub fn on_message(&mut self, msg: ControlMessage) {
        let Some(control) = self.registry.lookup(msg.status, msg.data1) else {
            log::trace!(
                "REV1: unmapped message {:02X} {:02X} {:02X}",
                msg.status,
                msg.data1,
                msg.data2
            );
            return;
        };

        self.dispatch(control, msg);
    }

    fn dispatch(&mut self, control: LogicalControl, msg: ControlMessage) {
        let deck = control.deck;
        let value = msg.data2;

        match control.kind {
            ControlKind::Shift => {
                self.session.shift_held = value == ON;
            }

            ControlKind::HotcuePad => {
                let pad = transform::pad_number(msg.data1);
                self.engine
                    .set(Group::Deck(deck), Param::HotcueActivate(pad), f64::from(value));
            }
            ControlKind::HotcuePadShift => {
                let pad = transform::pad_number(msg.data1);
                self.engine
                    .set(Group::Deck(deck), Param::HotcueClear(pad), f64::from(value));
            }

            ControlKind::SamplerPad => self.sampler_pad(deck, msg.data1, value),
            ControlKind::SamplerPadShift => self.sampler_pad_shift(deck, msg.data1, value),

            ControlKind::TempoSliderMsb => {
                self.session.high_res_msb[usize::from(deck - 1)] = value;
            }
            ControlKind::TempoSliderLsb => {
                let msb = self.session.high_res_msb[usize::from(deck - 1)];
                let full = transform::high_res_value(msb, value);
                self.engine
                    .set(Group::Deck(deck), Param::Rate, transform::rate_from_high_res(full));
            }

            ControlKind::JogTurn => self.jog_turn(deck, value),
            ControlKind::JogSearch => {
                let delta = transform::jog_delta(value);
                self.engine.set(
                    Group::Deck(deck),
                    Param::Jog,
                    f64::from(delta) * transform::FAST_SEEK_SCALE,
                );
            }
            ControlKind::JogTouch => self.jog_touch(deck, value),

            ControlKind::Sync => self.sync_pressed(deck, value),
            ControlKind::SyncShift => {
                if value > 0 {
                    self.engine.set(Group::Deck(deck), Param::SyncEnabled, 1.0);
                }
            }

            ControlKind::DeckSelect => self.deck_select_pressed(deck, value),
            ControlKind::Browse => self.browse_pressed(value),
        }
    }

    /// Sampler pad: retrigger a loaded slot, load into an empty one
    fn sampler_pad(&mut self, deck: u8, address: u8, value: u8) {
        let group = Group::Sampler(sampler_index(deck, address));
        if self.engine.get(group, Param::TrackLoaded) != 0.0 {
            self.engine.set(group, Param::CueGotoAndPlay, f64::from(value));
        } else {
            self.engine.set(group, Param::LoadSelectedTrack, f64::from(value));
        }
    }

    /// Shifted sampler pad: stop a playing slot, eject a stopped one
    fn sampler_pad_shift(&mut self, deck: u8, address: u8, value: u8) {
        let group = Group::Sampler(sampler_index(deck, address));
        if self.engine.get(group, Param::Play) != 0.0 {
            self.engine.set(group, Param::CueGotoAndStop, f64::from(value));
        } else if self.engine.get(group, Param::TrackLoaded) != 0.0 {
            self.engine.set(group, Param::Eject, f64::from(value));
        }
    }

    fn jog_turn(&mut self, deck: u8, value: u8) {
        let delta = transform::jog_delta(value);
        if self.engine.is_scratching(deck) {
            self.engine.scratch_tick(deck, delta);
        } else {
            self.engine.set(
                Group::Deck(deck),
                Param::Jog,
                f64::from(delta) * transform::BEND_SCALE,
            );
        }
    }

    fn jog_touch(&mut self, deck: u8, value: u8) {
        if value != 0 && self.session.vinyl_mode {
            self.engine.scratch_enable(
                deck,
                transform::SCRATCH_TICKS_PER_REV,
                transform::SCRATCH_RPM,
                transform::SCRATCH_ALPHA,
                transform::SCRATCH_BETA,
            );
        } else {
            self.engine.scratch_disable(deck);
        }
    }

    /// Sync press: a press while sync is latched unlatches it; otherwise the
    /// raw value goes to the one-shot beat sync
    fn sync_pressed(&mut self, deck: u8, value: u8) {
        let group = Group::Deck(deck);
        if self.engine.get(group, Param::SyncEnabled) != 0.0 && value > 0 {
            self.engine.set(group, Param::SyncEnabled, 0.0);
        } else {
            self.engine.set(group, Param::Beatsync, f64::from(value));
        }
    }

    /// Deck select consults the global shift flag (no shifted channel on the
    /// hardware): shift + press cycles the deck's rate range
    fn deck_select_pressed(&mut self, deck: u8, value: u8) {
        if value == 0 || !self.session.shift_held {
            return;
        }
        let group = Group::Deck(deck);
        let current = self.engine.get(group, Param::RateRange);
        self.engine
            .set(group, Param::RateRange, transform::next_tempo_range(current));
    }

    /// Browse press toggles preview-deck playback of the selected track
    fn browse_pressed(&mut self, value: u8) {
        if value == 0 {
            return;
        }

        if self.engine.get(Group::PreviewDeck, Param::Play) != 0.0 {
            self.engine.trigger(Group::PreviewDeck, Param::Stop);
            self.session.preview_seek_enabled = false;
        } else {
            self.engine
                .set(Group::PreviewDeck, Param::LoadSelectedTrackAndPlay, 1.0);
            self.session.preview_seek_enabled = true;
        }
    }

    /// Route an engine change notification to the lights
    ///
    /// The host calls this for every (group, param) registered during
    /// startup, on the same serial dispatch as MIDI input.
    pub fn on_engine_change(&mut self, group: Group, param: Param, value: f64) {
        match (group, param) {
            (Group::Deck(deck), Param::VuMeter) => {
                lights::set_vu_meter(&mut self.out, deck - 1, value);
            }
            (Group::Deck(deck), Param::TrackLoaded) => {
                lights::set_indicator(&mut self.out, chan::SPECIAL, deck - 1, value > 0.0);
            }
            (Group::Deck(deck), Param::LoopEnabled) => {
                lights::set_reloop_light(&mut self.out, deck - 1, value != 0.0);
            }
            (Group::EffectSlot { unit, effect }, Param::Enabled) => {
                lights::set_fx_light(&mut self.out, unit, effect, value != 0.0);
            }
            (Group::Sampler(sampler), Param::Play) => self.sampler_play_changed(sampler, value),
            _ => {
                log::trace!("REV1: unrouted change {} {} = {}", group, param, value);
            }
        }
    }

    /// Sampler playback started: blink its pad on the owning deck pair
    ///
    /// The hardware has eight pad LEDs per side shared by two banks:
    /// samplers 1-8 light decks 1 & 3, samplers 9-16 the same addresses on
    /// decks 2 & 4.
    fn sampler_play_changed(&mut self, sampler: u8, value: f64) {
        if value == 0.0 {
            return; // stop is observed by the blink tick itself
        }

        let pad = if sampler > PAD_COUNT { sampler - PAD_COUNT } else { sampler };
        let address = 0x30 + (pad - 1);
        let group = Group::Sampler(sampler);

        let decks = if sampler <= PAD_COUNT { [1, 3] } else { [2, 4] };
        for deck in decks {
            let status = chan::NOTE + deck_pad_channel(deck);
            self.blink.start(&mut self.scheduler, status, address, group);
        }
    }

    /// Periodic tick callback for a timer handle returned by the scheduler
    pub fn on_timer(&mut self, id: TimerId) {
        self.blink
            .on_tick(id, &mut self.engine, &mut self.out, &mut self.scheduler);
    }

    /// Is any shift button currently held?
    pub fn is_shift_held(&self) -> bool {
        self.session.shift_held
    }

    /// Did the browse button start the current preview playback?
    ///
    /// Reserved for preview seek handling; nothing in this mapping reads it.
    pub fn is_preview_seek_enabled(&self) -> bool {
        self.session.preview_seek_enabled
    }

    /// Enable or disable vinyl mode (jog touch scratching)
    pub fn set_vinyl_mode(&mut self, enabled: bool) {
        self.session.vinyl_mode = enabled;
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

/// Map a deck's sampler pad address to the sampler slot it triggers:
/// left-side decks (1, 3) carry bank one, right-side decks (2, 4) bank two
fn sampler_index(deck: u8, address: u8) -> u8 {
    let pad = transform::pad_number(address);
    if deck % 2 == 0 {
        pad + PAD_COUNT
    } else {
        pad
    }
}
