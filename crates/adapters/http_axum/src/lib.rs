//! # smartcity-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST-ish JSON API** for the inventory
//!   (`/api/users`, `/api/zones`, `/api/sensors`, `/api/devices`, `/api/readings`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and failures into HTTP responses
//!
//! ## Status codes
//! | outcome | status |
//! |---------|--------|
//! | created | 201 |
//! | validation failure, malformed body, missing reference | 400 |
//! | unknown or malformed id | 404 |
//! | delete blocked by dependents | 409 |
//! | storage failure | 500 |
//!
//! ## Dependency rule
//! Depends on `smartcity-app` (for port traits and services) and `smartcity-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
