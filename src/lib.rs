//! # Cottage Rental Reservation Service
//!
//! Reservation lifecycle and availability-conflict engine for a mountain
//! cottage marketplace, served as a REST API.
//!
//! ## Architecture
//!
//! - **domain**: reservations, stay periods, status transitions, cottages, callers
//! - **application**: use cases (booking, approval, cancellation, statistics)
//! - **infrastructure**: SeaORM persistence and JWT verification
//! - **interfaces**: axum HTTP API with Swagger documentation
//! - **shared**: errors, clock and shutdown signal

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use application::AppServices;
pub use config::{config_path, default_config_path, AppConfig};
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, JwtIdentityVerifier, SeaOrmRepositoryProvider,
};
pub use interfaces::http::create_api_router;
