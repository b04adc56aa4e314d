// gitlab-reporter state managers
// Managers own the persisted documents: profiles, selection and rules.

pub mod profile_manager;
pub mod rule_manager;
