//! Cottage aggregate
//!
//! The slice of the cottage registry the reservation engine depends on:
//! identity, name and ownership.

pub mod model;
pub mod repository;

pub use model::Cottage;
pub use repository::CottageRepository;
