//! Pioneer DDJ-REV1 controller mapping
//!
//! Binds the REV1's physical controls to mixing-engine actions and reflects
//! engine state back to the controller's status lights:
//! - A closed, static control registry resolving raw (status, address) pairs
//! - Per-control-class value transforms (14-bit tempo slider, jog deltas,
//!   scratch physics, pad extraction)
//! - Light encoding, including composite two-LED indicators and timed
//!   sampler-pad blinking
//! - Startup/shutdown orchestration with full light teardown
//!
//! # Architecture
//!
//! ```text
//! MIDI device → midir callback → flume channel → app loop → Rev1Controller
//!                                                               │
//! engine change notifications ──────────────────────────────────┤
//! periodic timer ticks ─────────────────────────────────────────┘
//! ```
//!
//! Everything downstream of the flume channel is strictly serial: the app
//! loop feeds messages, engine notifications, and timer ticks to the
//! controller one at a time, and no handler suspends. The engine, transport,
//! and timer scheduler are injected behind the traits in [`engine`], which is
//! also what makes the mapping testable without hardware.

mod blink;
mod connection;
mod controller;
mod engine;
mod input;
mod lights;
mod registry;
mod transform;
mod types;

pub use blink::{BlinkController, BLINK_INTERVAL};
pub use connection::{connect_output, list_input_ports, MidiConnectionError, MidirSender};
pub use controller::{Rev1Controller, POSITION_QUERY};
pub use engine::{MidiSender, MixEngine, Scheduler, TimerId};
pub use input::{ControlMessage, InputBridge};
pub use lights::{OFF, ON};
pub use registry::{ControlKind, ControlRegistry, LogicalControl};
pub use types::{Group, Param, DECK_COUNT, PAD_COUNT, SAMPLER_COUNT};
