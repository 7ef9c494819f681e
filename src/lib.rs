//! Client core for the turismo marketplace.
//!
//! Repositories talk to the REST backend and keep an SQLite row cache for
//! municipalities and entrepreneurs; view models expose every intent as an
//! observable [`state::StateSlot`].

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod repository;
pub mod session;
pub mod state;
pub mod viewmodel;

pub use context::AppContext;
pub use error::{Error, Result};
pub use repository::{Resource, ResourceStream};
