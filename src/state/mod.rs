//! Observable per-intent state used by the view models.

mod slot;

pub use slot::StateSlot;
