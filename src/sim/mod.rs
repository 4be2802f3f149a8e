/// Aggregation of daily profiles into yearly figures.
pub mod aggregate;
/// Day-index to calendar mapping.
pub mod calendar;
pub mod generator;
pub mod orchestrator;
pub mod types;
pub mod use_case;
/// User groups owning appliances.
pub mod user;

pub use aggregate::{EnergyReport, LoadProfiles, MonthlyEnergy};
pub use generator::DailyProfileGenerator;
pub use orchestrator::Orchestrator;
pub use types::{DailyProfile, SimConfig};
pub use use_case::UseCase;
pub use user::User;
