//! HTTP REST API
//!
//! - `middleware`: bearer authentication
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc};
