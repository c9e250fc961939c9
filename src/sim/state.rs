//! Round state and events
//!
//! Everything about a round that is not a physical body lives here.

use serde::{Deserialize, Serialize};

use super::ink::InkBudget;
use crate::settings::Tuning;

/// Phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Static bodies being (re)created
    Setup,
    /// Waiting for the player to commit a barrier
    Drawing,
    /// Pursuers released, countdown running
    ActivePursuit,
    /// Target survived the countdown
    Won,
    /// A pursuer reached the target
    Lost,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::Lost)
    }
}

/// Notable things that happened during an update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A drawn path became a barrier body
    BarrierCommitted { segments: usize },
    /// A released gesture was too short and its ink was refunded
    GestureDiscarded,
    /// Pursuers entered the world
    PursuersSpawned { count: u32 },
    /// One second of the protection countdown elapsed
    CountdownTick { remaining: u32 },
    Won,
    Lost,
}

/// Wall-clock protection countdown, counted in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    /// Seconds accumulated toward the next whole-second tick
    carry: f32,
    running: bool,
}

impl Countdown {
    /// Stopped countdown holding `seconds`
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            carry: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.carry = 0.0;
        self.running = true;
    }

    /// Stop and forget any partial second
    pub fn cancel(&mut self) {
        self.carry = 0.0;
        self.running = false;
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed elapsed wall-clock time; returns how many whole seconds ticked
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running || elapsed <= 0.0 {
            return 0;
        }
        self.carry += elapsed;
        let mut ticks = 0;
        while self.carry >= 1.0 && self.remaining > 0 {
            self.carry -= 1.0;
            self.remaining -= 1;
            ticks += 1;
        }
        if self.remaining == 0 {
            self.running = false;
        }
        ticks
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Mutable per-round bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub ink: InkBudget,
    pub countdown: Countdown,
    /// Physics ticks since the round started
    pub time_ticks: u64,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: RoundPhase::Setup,
            ink: InkBudget::new(tuning.max_ink),
            countdown: Countdown::new(tuning.protect_time),
            time_ticks: 0,
        }
    }
}
