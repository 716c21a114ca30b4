//! Timed blinking for sampler pad lights
//!
//! While a sampler slot plays, its pad LED toggles on a fixed period on both
//! the deck's normal and shift pad channels. Each periodic tick also polls
//! the slot's play state; once it reads below the playing threshold the
//! timer cancels itself and both mirrored lights are forced fully on.
//!
//! At most one timer exists per `(status, address)` key: starting a blink
//! cancels any prior timer for the key synchronously, before the new one is
//! scheduled.

use crate::engine::{MidiSender, MixEngine, Scheduler, TimerId};
use crate::lights::ON;
use crate::types::{Group, Param};
use std::collections::HashMap;
use std::time::Duration;

/// Blink toggle period
pub const BLINK_INTERVAL: Duration = Duration::from_millis(250);

/// One active blink: its timer handle, current light value, and the sampler
/// group polled for the stop condition
struct BlinkTimer {
    id: TimerId,
    value: u8,
    group: Group,
}

/// Per-key blink timer table
#[derive(Default)]
pub struct BlinkController {
    timers: HashMap<(u8, u8), BlinkTimer>,
    keys_by_timer: HashMap<TimerId, (u8, u8)>,
}

impl BlinkController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin blinking the light at (status, address), watching `group`'s
    /// play state for the stop condition
    ///
    /// Cancel-then-start: any existing timer for the key is cancelled first.
    pub fn start(&mut self, scheduler: &mut impl Scheduler, status: u8, address: u8, group: Group) {
        self.stop(scheduler, status, address);

        let id = scheduler.begin_periodic(BLINK_INTERVAL);
        log::debug!(
            "Blink: start {:02X}/{:02X} for {} (timer {})",
            status,
            address,
            group,
            id
        );
        self.timers.insert((status, address), BlinkTimer { id, value: ON, group });
        self.keys_by_timer.insert(id, (status, address));
    }

    /// Cancel the blink for a key; no-op if none is active
    pub fn stop(&mut self, scheduler: &mut impl Scheduler, status: u8, address: u8) {
        if let Some(timer) = self.timers.remove(&(status, address)) {
            self.keys_by_timer.remove(&timer.id);
            scheduler.cancel(timer.id);
            log::debug!("Blink: stop {:02X}/{:02X} (timer {})", status, address, timer.id);
        }
    }

    /// Cancel every active blink
    pub fn stop_all(&mut self, scheduler: &mut impl Scheduler) {
        for timer in self.timers.values() {
            scheduler.cancel(timer.id);
        }
        self.timers.clear();
        self.keys_by_timer.clear();
    }

    /// Periodic tick for a scheduled timer
    ///
    /// Flips the light on the key's channel and its shift mirror one channel
    /// above. Once the watched group's play state drops below 1, the timer is
    /// cancelled and both lights are forced on. Ticks for unknown timers are
    /// dropped (the timer raced its own cancellation).
    pub fn on_tick(
        &mut self,
        id: TimerId,
        engine: &mut impl MixEngine,
        out: &mut impl MidiSender,
        scheduler: &mut impl Scheduler,
    ) {
        let Some(&(status, address)) = self.keys_by_timer.get(&id) else {
            return;
        };

        let Some(timer) = self.timers.get_mut(&(status, address)) else {
            return;
        };
        timer.value = ON - timer.value;
        out.send(status, address, timer.value);
        // Mirror on the shift layer one sub-channel above
        out.send(status + 1, address, timer.value);
        let group = timer.group;

        if engine.get(group, Param::Play) < 1.0 {
            self.stop(scheduler, status, address);
            out.send(status, address, ON);
            out.send(status + 1, address, ON);
        }
    }

    /// Is a blink active for this key?
    pub fn is_active(&self, status: u8, address: u8) -> bool {
        self.timers.contains_key(&(status, address))
    }

    /// Number of active blink timers
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{FakeEngine, FakeScheduler, FakeSender};
    use crate::lights::OFF;

    fn playing_engine(group: Group) -> FakeEngine {
        FakeEngine::default().with_value(group, Param::Play, 1.0)
    }

    #[test]
    fn test_start_schedules_one_timer() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();

        blink.start(&mut scheduler, 0x97, 0x30, Group::Sampler(1));

        assert!(blink.is_active(0x97, 0x30));
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_restart_cancels_before_scheduling() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();

        blink.start(&mut scheduler, 0x97, 0x30, Group::Sampler(1));
        let first = scheduler.started[0];

        blink.start(&mut scheduler, 0x97, 0x30, Group::Sampler(1));

        // The prior timer was cancelled before the new one was scheduled
        assert_eq!(scheduler.cancelled, vec![first]);
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(blink.active_count(), 1);
    }

    #[test]
    fn test_tick_toggles_and_mirrors() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();
        let mut engine = playing_engine(Group::Sampler(3));
        let mut out = FakeSender::default();

        blink.start(&mut scheduler, 0x97, 0x32, Group::Sampler(3));
        let id = scheduler.started[0];

        // First tick flips to off, second back to on, on both channels
        blink.on_tick(id, &mut engine, &mut out, &mut scheduler);
        blink.on_tick(id, &mut engine, &mut out, &mut scheduler);

        assert_eq!(out.sent_to(0x97, 0x32), vec![OFF, ON]);
        assert_eq!(out.sent_to(0x98, 0x32), vec![OFF, ON]);
        assert!(blink.is_active(0x97, 0x32));
    }

    #[test]
    fn test_playback_stop_forces_lights_on() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();
        let mut engine = FakeEngine::default(); // play reads 0.0
        let mut out = FakeSender::default();

        blink.start(&mut scheduler, 0x99, 0x30, Group::Sampler(9));
        let id = scheduler.started[0];

        blink.on_tick(id, &mut engine, &mut out, &mut scheduler);

        assert!(!blink.is_active(0x99, 0x30));
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(out.last_value(0x99, 0x30), Some(ON));
        assert_eq!(out.last_value(0x9A, 0x30), Some(ON));
    }

    #[test]
    fn test_stop_without_timer_is_noop() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();

        blink.stop(&mut scheduler, 0x97, 0x30);
        assert!(scheduler.cancelled.is_empty());
    }

    #[test]
    fn test_tick_after_cancel_is_dropped() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();
        let mut engine = playing_engine(Group::Sampler(1));
        let mut out = FakeSender::default();

        blink.start(&mut scheduler, 0x97, 0x30, Group::Sampler(1));
        let id = scheduler.started[0];
        blink.stop(&mut scheduler, 0x97, 0x30);

        blink.on_tick(id, &mut engine, &mut out, &mut scheduler);
        assert!(out.sent.is_empty());
    }

    #[test]
    fn test_stop_all() {
        let mut blink = BlinkController::new();
        let mut scheduler = FakeScheduler::default();

        blink.start(&mut scheduler, 0x97, 0x30, Group::Sampler(1));
        blink.start(&mut scheduler, 0x9B, 0x30, Group::Sampler(1));
        blink.stop_all(&mut scheduler);

        assert_eq!(blink.active_count(), 0);
        assert_eq!(scheduler.active_count(), 0);
    }
}
