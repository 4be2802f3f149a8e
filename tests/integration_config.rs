//! TOML-declared scenarios run end to end.

use demand_sim::config::ScenarioConfig;
use demand_sim::error::SimError;

const WEEKEND_WORKSHOP: &str = r#"
[simulation]
days = 14
seed = 9
start_date = "2025-01-06"

[[users]]
name = "Workshop"
num_users = 2

[[users.appliances]]
name = "Saw"
power = 1500.0
func_time = 30
windows = [{ span = [540, 720], random_var = 0.1 }]
time_fraction_random_variability = 0.1
day_type = "weekends"

[[users.appliances]]
name = "Fridge"
power = 150.0
func_time = 1440
windows = [{ span = [0, 1440] }]
fixed = true
"#;

fn run(toml: &str) -> Result<demand_sim::sim::LoadProfiles, SimError> {
    let orchestrator = ScenarioConfig::from_toml_str(toml)?
        .into_use_case()
        .initialize()?;
    Ok(orchestrator.generate_daily_load_profiles())
}

#[test]
fn weekend_only_appliance_is_silent_on_weekdays() {
    let profiles = run(WEEKEND_WORKSHOP).expect("scenario should run");
    assert_eq!(profiles.len(), 14);
    // 2025-01-06 is a Monday: days 5, 6, 12 and 13 are weekends
    for day in profiles.profiles() {
        let weekend = matches!(day.day() % 7, 5 | 6);
        let fridge_only = day.samples().iter().all(|&w| w == 300.0);
        assert_eq!(!weekend, fridge_only, "day {}", day.day());
        assert!(day.peak() <= 300.0 + 2.0 * 1500.0);
    }
}

#[test]
fn structural_errors_surface_before_generation() {
    let broken = WEEKEND_WORKSHOP.replace("span = [540, 720]", "span = [720, 540]");
    let err = run(&broken).expect_err("reversed window should be rejected");
    let errors = err.config_errors().expect("structural problems are configuration errors");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].field, "users[0].appliances[0].windows[0]");
}

#[test]
fn unknown_keys_are_rejected_at_parse_time() {
    let typo = WEEKEND_WORKSHOP.replace("func_time = 30", "func_tme = 30");
    assert!(matches!(run(&typo), Err(SimError::Toml(_))));
}
