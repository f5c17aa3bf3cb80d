//! Ledger Service Library
//!
//! This library acts as the core of the Ledger Service, exporting the
//! necessary modules for the application binary and integration tests.
//!
//! # Modules
//!
//! * `api` - Contains the HTTP interface (routes, guard, DTOs).
//! * `config` - Process-wide configuration loaded once at startup.
//! * `domain` - Contains the domain entities and business rules.
//! * `infrastructure` - Contains the concrete implementations of repositories and gateways.
//! * `jobs` - Contains background maintenance jobs.
//! * `use_cases` - Contains the application business logic and workflows.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod jobs;
pub mod use_cases;
