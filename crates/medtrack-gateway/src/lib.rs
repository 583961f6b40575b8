//! # MedTrack Gateway
//! JSON API over the record store and the reminder engine.

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{router, start, AppState};
