//! Capability traits at the host boundary
//!
//! The mapping core is pure dispatch: it reads and writes engine parameters,
//! emits MIDI, and schedules periodic callbacks, all through these traits.
//! The host injects real implementations; tests inject deterministic fakes.
//! Everything here is assumed infallible — unknown controls are dropped
//! before they reach the engine, and transport writes are fire-and-forget.

use crate::types::{Group, Param};
use std::time::Duration;

/// Handle for a recurring scheduled callback
pub type TimerId = u64;

/// Read/write access to the host mixing engine
///
/// Scratch methods take a 1-based deck number, matching the engine's
/// scratch API.
pub trait MixEngine {
    /// Read a parameter's current value
    fn get(&self, group: Group, param: Param) -> f64;
    /// Write a parameter value
    fn set(&mut self, group: Group, param: Param, value: f64);
    /// Fire a one-shot action (press-and-release semantics)
    fn trigger(&mut self, group: Group, param: Param);
    /// Register interest in change notifications for a parameter
    ///
    /// The host routes subsequent changes into
    /// [`Rev1Controller::on_engine_change`](crate::Rev1Controller::on_engine_change)
    /// on the same serial dispatch as MIDI input.
    fn subscribe(&mut self, group: Group, param: Param);
    /// Enable soft takeover for a parameter
    fn soft_takeover(&mut self, group: Group, param: Param);

    /// Is a scratch session active for this deck?
    fn is_scratching(&self, deck: u8) -> bool;
    /// Begin a scratch session with the given turntable physics
    fn scratch_enable(&mut self, deck: u8, ticks_per_rev: u32, rpm: f64, alpha: f64, beta: f64);
    /// Feed jog movement into an active scratch session
    fn scratch_tick(&mut self, deck: u8, interval: i32);
    /// End the scratch session for this deck
    fn scratch_disable(&mut self, deck: u8);
}

/// Outgoing MIDI writes to the device
pub trait MidiSender {
    /// Send one short message (status, data1, data2)
    fn send(&mut self, status: u8, data1: u8, data2: u8);
    /// Send a raw sysex frame (used once, for the startup position query)
    fn send_sysex(&mut self, data: &[u8]);
}

/// Recurring-callback scheduling
///
/// The host invokes [`Rev1Controller::on_timer`](crate::Rev1Controller::on_timer)
/// with the returned id each period, on the same serial dispatch as all other
/// events. Cancelling an already-cancelled id is a no-op.
pub trait Scheduler {
    /// Schedule a recurring callback and return its handle
    fn begin_periodic(&mut self, interval: Duration) -> TimerId;
    /// Cancel a previously scheduled callback
    fn cancel(&mut self, id: TimerId);
}

#[cfg(test)]
pub(crate) mod fake {
    //! Deterministic fakes for controller and blink tests

    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    pub struct FakeEngine {
        pub values: HashMap<(Group, Param), f64>,
        pub sets: Vec<(Group, Param, f64)>,
        pub triggers: Vec<(Group, Param)>,
        pub subscriptions: Vec<(Group, Param)>,
        pub soft_takeovers: Vec<(Group, Param)>,
        pub scratching: HashSet<u8>,
        pub scratch_enables: Vec<(u8, u32, f64, f64, f64)>,
        pub scratch_ticks: Vec<(u8, i32)>,
        pub scratch_disables: Vec<u8>,
    }

    impl FakeEngine {
        pub fn with_value(mut self, group: Group, param: Param, value: f64) -> Self {
            self.values.insert((group, param), value);
            self
        }

        /// Last value written to a parameter, if any write happened
        pub fn last_set(&self, group: Group, param: Param) -> Option<f64> {
            self.sets
                .iter()
                .rev()
                .find(|(g, p, _)| *g == group && *p == param)
                .map(|(_, _, v)| *v)
        }
    }

    impl MixEngine for FakeEngine {
        fn get(&self, group: Group, param: Param) -> f64 {
            self.values.get(&(group, param)).copied().unwrap_or(0.0)
        }

        fn set(&mut self, group: Group, param: Param, value: f64) {
            self.values.insert((group, param), value);
            self.sets.push((group, param, value));
        }

        fn trigger(&mut self, group: Group, param: Param) {
            self.triggers.push((group, param));
        }

        fn subscribe(&mut self, group: Group, param: Param) {
            self.subscriptions.push((group, param));
        }

        fn soft_takeover(&mut self, group: Group, param: Param) {
            self.soft_takeovers.push((group, param));
        }

        fn is_scratching(&self, deck: u8) -> bool {
            self.scratching.contains(&deck)
        }

        fn scratch_enable(&mut self, deck: u8, ticks_per_rev: u32, rpm: f64, alpha: f64, beta: f64) {
            self.scratching.insert(deck);
            self.scratch_enables.push((deck, ticks_per_rev, rpm, alpha, beta));
        }

        fn scratch_tick(&mut self, deck: u8, interval: i32) {
            self.scratch_ticks.push((deck, interval));
        }

        fn scratch_disable(&mut self, deck: u8) {
            self.scratching.remove(&deck);
            self.scratch_disables.push(deck);
        }
    }

    #[derive(Default)]
    pub struct FakeSender {
        pub sent: Vec<(u8, u8, u8)>,
        pub sysex: Vec<Vec<u8>>,
        pub last: HashMap<(u8, u8), u8>,
    }

    impl FakeSender {
        /// Last value sent to an address, if any
        pub fn last_value(&self, status: u8, data1: u8) -> Option<u8> {
            self.last.get(&(status, data1)).copied()
        }

        /// All messages sent to one address, in order
        pub fn sent_to(&self, status: u8, data1: u8) -> Vec<u8> {
            self.sent
                .iter()
                .filter(|(s, d1, _)| *s == status && *d1 == data1)
                .map(|(_, _, d2)| *d2)
                .collect()
        }
    }

    impl MidiSender for FakeSender {
        fn send(&mut self, status: u8, data1: u8, data2: u8) {
            self.sent.push((status, data1, data2));
            self.last.insert((status, data1), data2);
        }

        fn send_sysex(&mut self, data: &[u8]) {
            self.sysex.push(data.to_vec());
        }
    }

    #[derive(Default)]
    pub struct FakeScheduler {
        next_id: TimerId,
        pub active: HashSet<TimerId>,
        pub started: Vec<TimerId>,
        pub cancelled: Vec<TimerId>,
    }

    impl FakeScheduler {
        pub fn active_count(&self) -> usize {
            self.active.len()
        }
    }

    impl Scheduler for FakeScheduler {
        fn begin_periodic(&mut self, _interval: Duration) -> TimerId {
            self.next_id += 1;
            self.active.insert(self.next_id);
            self.started.push(self.next_id);
            self.next_id
        }

        fn cancel(&mut self, id: TimerId) {
            self.active.remove(&id);
            self.cancelled.push(id);
        }
    }
}
