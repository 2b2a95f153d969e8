//! Fixed-cycle traffic signal guarding the crossing
//!
//! The signal runs on its own tick counter, independent of the time of day.

use log::debug;
use serde::Serialize;

use super::types::{GREEN_DURATION, RED_DURATION, YELLOW_DURATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalPhase {
    Green,
    Yellow,
    Red,
}

impl SignalPhase {
    /// Ticks spent in this phase
    pub fn duration(self) -> u32 {
        match self {
            SignalPhase::Green => GREEN_DURATION,
            SignalPhase::Yellow => YELLOW_DURATION,
            SignalPhase::Red => RED_DURATION,
        }
    }

    /// The phase that follows in the fixed cycle
    pub fn next(self) -> Self {
        match self {
            SignalPhase::Green => SignalPhase::Yellow,
            SignalPhase::Yellow => SignalPhase::Red,
            SignalPhase::Red => SignalPhase::Green,
        }
    }

    /// Vehicles treat yellow like red
    pub fn must_stop(self) -> bool {
        !matches!(self, SignalPhase::Green)
    }
}

/// Emitted on the tick a phase ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: SignalPhase,
    pub to: SignalPhase,
}

impl PhaseChange {
    /// A change back to green closes a full cycle
    pub fn completes_cycle(&self) -> bool {
        self.to == SignalPhase::Green
    }
}

/// What vehicles and pedestrians read from the signal each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalReading {
    pub phase: SignalPhase,
    /// Ticks left before the phase ends
    pub remaining: u32,
    pub must_stop: bool,
}

impl SignalReading {
    /// A reading taken `timer` ticks into `phase`
    pub fn new(phase: SignalPhase, timer: u32) -> Self {
        Self {
            phase,
            remaining: phase.duration().saturating_sub(timer),
            must_stop: phase.must_stop(),
        }
    }
}

/// Green -> Yellow -> Red -> Green timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalController {
    phase: SignalPhase,
    timer: u32,
}

impl Default for SignalController {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalController {
    pub fn new() -> Self {
        Self::starting_at(SignalPhase::Green, 0)
    }

    /// Start part-way through a phase; the timer is clamped inside the phase
    pub fn starting_at(phase: SignalPhase, timer: u32) -> Self {
        Self {
            phase,
            timer: timer.min(phase.duration() - 1),
        }
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn remaining(&self) -> u32 {
        self.phase.duration() - self.timer
    }

    pub fn must_stop(&self) -> bool {
        self.phase.must_stop()
    }

    pub fn reading(&self) -> SignalReading {
        SignalReading::new(self.phase, self.timer)
    }

    /// Advance one tick, switching phase when the current one runs out
    pub fn tick(&mut self) -> Option<PhaseChange> {
        self.timer += 1;
        if self.timer < self.phase.duration() {
            return None;
        }

        let change = PhaseChange {
            from: self.phase,
            to: self.phase.next(),
        };
        self.phase = change.to;
        self.timer = 0;
        debug!("Signal {:?} -> {:?}", change.from, change.to);
        Some(change)
    }
}
