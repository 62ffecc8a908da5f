use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use ups_core::{
    state::format_status, BatteryMachine, BatteryState, PowerSwitch, Reading, Result, StatusSink,
    TickOutcome,
};

/// Sink that mirrors the original tray applet's log output: one status
/// line per reading, a warning per countdown tick.
#[derive(Debug, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn status(&mut self, reading: &Reading, state: &BatteryState) {
        tracing::info!("{}", format_status(reading, state));
    }

    fn countdown(&mut self, remaining: u32) {
        tracing::warn!("battery critical; auto shutdown after {remaining} seconds");
    }

    fn countdown_cancelled(&mut self) {
        tracing::info!("charging resumed; auto shutdown cancelled");
    }
}

/// Drive the battery state machine until the poller goes away or the
/// shutdown countdown elapses.
///
/// Readings and countdown ticks are multiplexed onto this one task, so
/// every state mutation happens on a single logical thread. Power-off
/// is invoked at most once; the loop returns immediately afterwards.
pub async fn run<S, P>(
    mut readings: mpsc::Receiver<Reading>,
    mut machine: BatteryMachine,
    mut sink: S,
    mut power: P,
) -> Result<()>
where
    S: StatusSink,
    P: PowerSwitch,
{
    let mut ticker = time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe = readings.recv() => {
                let Some(reading) = maybe else {
                    tracing::info!("reading channel closed; monitor exiting");
                    return Ok(());
                };
                let state = machine.update(&reading);
                sink.status(&reading, &state);
            }
            _ = ticker.tick() => match machine.tick() {
                TickOutcome::Idle => {}
                TickOutcome::Ticking { remaining } => sink.countdown(remaining),
                TickOutcome::Cancelled => sink.countdown_cancelled(),
                TickOutcome::ShutdownRequested => {
                    tracing::error!("battery critical for the full countdown; powering off");
                    return power.power_off();
                }
            },
        }
    }
}
