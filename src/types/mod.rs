// gitlab-reporter shared type definitions
// Each submodule defines types used across the crate.

pub mod capture;
pub mod errors;
pub mod issue;
pub mod profile;
pub mod rule;
pub mod settings;
