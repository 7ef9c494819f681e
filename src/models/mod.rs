//! Serde types matching the turismo REST API.

mod booking;
mod cart;
mod catalog;
mod chat;
mod directory;
mod location;
mod user;

pub use booking::*;
pub use cart::*;
pub use catalog::*;
pub use chat::*;
pub use directory::*;
pub use location::*;
pub use user::*;
