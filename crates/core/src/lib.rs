pub mod error;
pub mod hooks;
pub mod machine;
pub mod state;

pub use error::{Result, UpsError};
pub use hooks::{PowerSwitch, StatusSink};
pub use machine::{BatteryMachine, TickOutcome};
pub use state::{BatteryState, Reading, Thresholds};
