//! Tick phases. Each module exposes the pure engine functions it is built
//! on alongside the `*_system` wrapper the schedule runs.

pub mod aggression;
pub mod budget;
pub mod calendar;
pub mod economy;
pub mod expiry;
pub mod history;
pub mod logging;
pub mod occupation;
pub mod policy;
pub mod recovery;
pub mod victory;
pub mod warfare;

pub use aggression::aggression_system;
pub use budget::budget_system;
pub use calendar::calendar_system;
pub use economy::economy_system;
pub use expiry::expiry_system;
pub use history::history_system;
pub use logging::logging_system;
pub use policy::policy_automation_system;
pub use recovery::recovery_system;
pub use victory::game_over_system;
pub use warfare::warfare_system;
