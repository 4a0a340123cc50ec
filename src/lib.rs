/// Basic application code
pub mod app;
/// Administrator authorization
pub mod auth;
/// Startup seeding of administrators and themes
pub mod bootstrap;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Image post-processing and media serving
pub mod media;
/// Stored records
pub mod model;
/// Scheduled publishing of due drafts
pub mod publisher;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
/// JSON representations of stored records
pub mod view;
