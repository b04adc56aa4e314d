//! gitlab-reporter: native host for a browser extension that files annotated
//! bug reports as GitLab issues.
//!
//! The core picks the GitLab project profile that applies to the page under
//! test, from saved profiles and ordered URL-substring rules. This library
//! crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
