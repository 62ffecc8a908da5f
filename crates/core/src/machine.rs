use crate::state::{BatteryState, Reading, Thresholds};

/// Shutdown countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No countdown running.
    Idle,
    /// Counting down to power-off; `remaining` seconds left.
    Warning { remaining: u32 },
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown was running.
    Idle,
    /// Countdown advanced; `remaining` seconds until power-off.
    Ticking { remaining: u32 },
    /// Charging resumed, countdown cancelled.
    Cancelled,
    /// Countdown elapsed while still discharging. Emitted exactly once.
    ShutdownRequested,
}

/// The battery state machine.
///
/// [`update`](Self::update) is fed every reading the poller produces;
/// [`tick`](Self::tick) is called once per second by the run loop to
/// advance the countdown. Both must run on the same logical thread —
/// the machine holds all mutable state and is not `Sync`.
#[derive(Debug)]
pub struct BatteryMachine {
    thresholds: Thresholds,
    countdown_secs: u32,
    countdown: Countdown,
    /// Charging flag from the last accepted reading. The countdown
    /// re-checks this on every tick, so plugging the charger in at any
    /// point during the warning cancels it.
    charging: bool,
    /// Latched once [`TickOutcome::ShutdownRequested`] has been emitted
    /// so a shutdown can never be requested twice.
    shutdown_signalled: bool,
}

impl BatteryMachine {
    pub fn new(thresholds: Thresholds, countdown_secs: u32) -> Self {
        Self {
            thresholds,
            countdown_secs,
            countdown: Countdown::Idle,
            charging: false,
            shutdown_signalled: false,
        }
    }

    /// Fold a fresh reading into the machine and return the derived
    /// battery state.
    ///
    /// Starts the shutdown countdown when charge is at or below the
    /// critical threshold while discharging. An already-running
    /// countdown is left untouched; a cancelled one restarts at the
    /// full duration the next time the condition holds.
    pub fn update(&mut self, reading: &Reading) -> BatteryState {
        self.charging = self.thresholds.is_charging(reading.current_ma);
        let percentage = self.thresholds.percentage(reading.volts);

        if percentage <= self.thresholds.critical_percent
            && !self.charging
            && self.countdown == Countdown::Idle
            && !self.shutdown_signalled
        {
            self.countdown = Countdown::Warning {
                remaining: self.countdown_secs,
            };
        }

        BatteryState {
            percentage,
            charging: self.charging,
            countdown_remaining: self.countdown_remaining(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// With a 60-second countdown, `ShutdownRequested` fires on the
    /// 60th tick after the countdown started, and only if every one of
    /// those ticks saw the battery still discharging.
    pub fn tick(&mut self) -> TickOutcome {
        let Countdown::Warning { remaining } = self.countdown else {
            return TickOutcome::Idle;
        };

        if self.charging {
            self.countdown = Countdown::Idle;
            return TickOutcome::Cancelled;
        }

        // A zero-length countdown (configurable) lands here with
        // remaining == 0 already.
        if remaining <= 1 {
            self.countdown = Countdown::Idle;
            self.shutdown_signalled = true;
            return TickOutcome::ShutdownRequested;
        }

        let remaining = remaining - 1;
        self.countdown = Countdown::Warning { remaining };
        TickOutcome::Ticking { remaining }
    }

    /// Seconds left on the countdown, `None` when idle.
    #[must_use]
    pub fn countdown_remaining(&self) -> Option<u32> {
        match self.countdown {
            Countdown::Idle => None,
            Countdown::Warning { remaining } => Some(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> BatteryMachine {
        BatteryMachine::new(Thresholds::default(), 60)
    }

    /// ~8% charge, discharging.
    const LOW: Reading = Reading {
        volts: 3.1,
        current_ma: -200,
    };
    /// ~8% charge, on charger.
    const LOW_CHARGING: Reading = Reading {
        volts: 3.1,
        current_ma: 300,
    };

    #[test]
    fn healthy_battery_stays_idle() {
        let mut m = machine();
        let state = m.update(&Reading {
            volts: 4.0,
            current_ma: -150,
        });
        assert_eq!(state.percentage, 83);
        assert!(!state.charging);
        assert_eq!(state.countdown_remaining, None);
        assert_eq!(m.tick(), TickOutcome::Idle);
    }

    #[test]
    fn low_battery_while_charging_stays_idle() {
        let mut m = machine();
        let state = m.update(&LOW_CHARGING);
        assert!(state.charging);
        assert_eq!(state.countdown_remaining, None);
        assert_eq!(m.tick(), TickOutcome::Idle);
    }

    #[test]
    fn low_battery_starts_countdown_at_full_duration() {
        let mut m = machine();
        let state = m.update(&LOW);
        assert_eq!(state.countdown_remaining, Some(60));
        assert_eq!(m.tick(), TickOutcome::Ticking { remaining: 59 });
    }

    #[test]
    fn shutdown_fires_exactly_once_on_the_60th_tick() {
        let mut m = machine();
        m.update(&LOW);

        for expected in (1..=59).rev() {
            m.update(&LOW);
            assert_eq!(m.tick(), TickOutcome::Ticking { remaining: expected });
        }
        m.update(&LOW);
        assert_eq!(m.tick(), TickOutcome::ShutdownRequested);

        // Further low readings must never re-arm the countdown.
        m.update(&LOW);
        assert_eq!(m.tick(), TickOutcome::Idle);
        assert_eq!(m.update(&LOW).countdown_remaining, None);
    }

    #[test]
    fn charging_cancels_countdown_at_any_point() {
        let mut m = machine();
        m.update(&LOW);
        for _ in 0..30 {
            assert!(matches!(m.tick(), TickOutcome::Ticking { .. }));
        }

        m.update(&LOW_CHARGING);
        assert_eq!(m.tick(), TickOutcome::Cancelled);
        assert_eq!(m.tick(), TickOutcome::Idle);
        assert_eq!(m.countdown_remaining(), None);
    }

    #[test]
    fn charging_on_final_tick_still_cancels() {
        let mut m = machine();
        m.update(&LOW);
        for _ in 0..59 {
            assert!(matches!(m.tick(), TickOutcome::Ticking { .. }));
        }

        // Warning(1): the next tick would power off, but the charger
        // lands first.
        m.update(&LOW_CHARGING);
        assert_eq!(m.tick(), TickOutcome::Cancelled);
    }

    #[test]
    fn reentering_low_battery_restarts_at_full_duration() {
        let mut m = machine();
        m.update(&LOW);
        for _ in 0..40 {
            m.tick();
        }
        m.update(&LOW_CHARGING);
        assert_eq!(m.tick(), TickOutcome::Cancelled);

        let state = m.update(&LOW);
        assert_eq!(state.countdown_remaining, Some(60));
        assert_eq!(m.tick(), TickOutcome::Ticking { remaining: 59 });
    }

    #[test]
    fn recovery_above_critical_does_not_cancel() {
        let mut m = machine();
        m.update(&LOW);
        m.tick();

        // Voltage bounces back above the critical threshold but the
        // pack is still discharging: the countdown keeps running.
        let state = m.update(&Reading {
            volts: 3.5,
            current_ma: -200,
        });
        assert!(state.percentage > 10);
        assert_eq!(state.countdown_remaining, Some(59));
        assert_eq!(m.tick(), TickOutcome::Ticking { remaining: 58 });
    }

    #[test]
    fn zero_length_countdown_shuts_down_on_first_tick() {
        let mut m = BatteryMachine::new(Thresholds::default(), 0);
        let state = m.update(&LOW);
        assert_eq!(state.countdown_remaining, Some(0));
        assert_eq!(m.tick(), TickOutcome::ShutdownRequested);
        assert_eq!(m.tick(), TickOutcome::Idle);
    }

    #[test]
    fn running_countdown_is_not_restarted_by_more_low_readings() {
        let mut m = machine();
        m.update(&LOW);
        m.tick();
        m.tick();

        let state = m.update(&LOW);
        assert_eq!(state.countdown_remaining, Some(58));
    }
}
