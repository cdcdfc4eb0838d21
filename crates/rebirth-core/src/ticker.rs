//! Wall-clock driver for a life journey.
//!
//! The host calls [`JourneyTicker::on_elapsed`] from its frame or timer loop;
//! the ticker converts elapsed milliseconds into whole journey years. Time
//! only accumulates while playing, and pausing discards any partial year so
//! a paused ticker never fires a stale advance.

use rebirth_logic::journey::{JourneyStep, LifeJourney};
use rebirth_logic::settings::GameSettings;

#[derive(Debug, Clone)]
pub struct JourneyTicker {
    interval_ms: u64,
    pause_on_decision: bool,
    running: bool,
    carry_ms: u64,
}

impl JourneyTicker {
    pub fn new(interval_ms: u64, pause_on_decision: bool) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            pause_on_decision,
            running: false,
            carry_ms: 0,
        }
    }

    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(settings.journey_tick_ms, settings.pause_on_decision)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn play(&mut self) {
        self.running = true;
    }

    /// Stop the clock. Pausing a paused ticker is a no-op.
    pub fn pause(&mut self) {
        self.running = false;
        self.carry_ms = 0;
    }

    /// Feed elapsed wall time and run every advance that became due.
    ///
    /// Stops itself when the journey completes, and on a decision when
    /// configured to. Returns the steps taken, in order.
    pub fn on_elapsed(&mut self, journey: &mut LifeJourney, elapsed_ms: u64) -> Vec<JourneyStep> {
        let mut steps = Vec::new();
        if !self.running {
            return steps;
        }
        if journey.state().is_completed {
            self.pause();
            return steps;
        }

        self.carry_ms += elapsed_ms;
        while self.running && self.carry_ms >= self.interval_ms {
            self.carry_ms -= self.interval_ms;
            let step = journey.advance();
            let blocked = matches!(step, JourneyStep::AwaitingDecision { .. });
            match step {
                JourneyStep::Completed { .. } | JourneyStep::Finished => self.pause(),
                JourneyStep::DecisionRequired { .. } | JourneyStep::AwaitingDecision { .. }
                    if self.pause_on_decision =>
                {
                    self.pause()
                }
                _ => {}
            }
            steps.push(step);
            if blocked {
                // Blocked years are not banked.
                self.carry_ms = 0;
                break;
            }
        }
        steps
    }
}
