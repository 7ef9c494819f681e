//! View models: one container per feature, holding a [`StateSlot`] per
//! intent. Intents return immediately; observers watch the slots.
//!
//! List intents remember the last query they were issued with, and
//! successful deletes and status changes chain a reload of that query.
//!
//! [`StateSlot`]: crate::state::StateSlot

use std::sync::{Arc, Mutex, PoisonError};

mod auth;
mod booking;
mod cart;
mod catalog;
mod chat;
mod directory;
mod location;
mod user;

pub use auth::AuthViewModel;
pub use booking::{PaymentViewModel, ReservationViewModel};
pub use cart::{CartReservationViewModel, CartViewModel};
pub use catalog::{CategoryViewModel, PlanViewModel, ServiceViewModel};
pub use chat::ChatViewModel;
pub use directory::{EntrepreneurViewModel, MunicipalityViewModel};
pub use location::LocationViewModel;
pub use user::UserViewModel;

/// The query the most recent list intent was issued with.
#[derive(Clone)]
pub(crate) struct LastQuery<Q> {
  inner: Arc<Mutex<Q>>,
}

impl<Q: Clone> LastQuery<Q> {
  pub(crate) fn new(initial: Q) -> Self {
    Self {
      inner: Arc::new(Mutex::new(initial)),
    }
  }

  pub(crate) fn set(&self, query: Q) {
    *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = query;
  }

  pub(crate) fn get(&self) -> Q {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn last_query_is_shared_between_clones() {
    let query = LastQuery::new(1);
    let other = query.clone();
    other.set(5);
    assert_eq!(query.get(), 5);
  }
}
