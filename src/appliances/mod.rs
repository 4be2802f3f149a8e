//! Appliance declarations and the per-day sampling models behind them.

/// On-time allocation strategies.
pub mod allocation;
pub mod appliance;
/// Duty-cycle patterns and their per-day layout.
pub mod duty_cycle;
pub mod types;
/// Functioning windows and their randomized realization.
pub mod window;

// Re-export the main types for convenience
pub use allocation::{Allocation, Allocator, IndependentAllocation, SharedAllocation};
pub use appliance::{Appliance, PreparedAppliance};
pub use duty_cycle::{CycleWindow, DutyCycle, Segment, SubCycle};
pub use types::MINUTES_PER_DAY;
pub use window::{Window, WindowSampler};
