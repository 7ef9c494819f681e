use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::repository::{Resource, ResourceStream};

struct Inner<T> {
  tx: watch::Sender<Option<Resource<T>>>,
  generation: AtomicU64,
  /// In-flight task. Also serializes generation checks against publishes.
  task: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Inner<T> {
  fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    self.task.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Publish `state` only if `generation` is still the latest launch.
  fn publish(&self, generation: u64, state: Resource<T>) -> bool {
    let _guard = self.task();
    if self.generation.load(Ordering::SeqCst) != generation {
      return false;
    }
    self.tx.send_replace(Some(state));
    true
  }
}

/// Observable holder for the latest state of one intent.
///
/// `None` means the intent was never issued (or was cleared). Each launch
/// supersedes the previous one: the old task is aborted and anything it
/// still tries to publish is dropped, so a slow stale response can never
/// overwrite a newer result.
pub struct StateSlot<T> {
  inner: Arc<Inner<T>>,
}

impl<T> Clone for StateSlot<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T> Default for StateSlot<T>
where
  T: Clone + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> StateSlot<T>
where
  T: Clone + Send + Sync + 'static,
{
  pub fn new() -> Self {
    let (tx, _) = watch::channel(None);
    Self {
      inner: Arc::new(Inner {
        tx,
        generation: AtomicU64::new(0),
        task: Mutex::new(None),
      }),
    }
  }

  pub fn launch(&self, stream: ResourceStream<T>) {
    self.launch_then(stream, |_: &T| {});
  }

  /// Drive `stream` into this slot. `on_success` runs before the success
  /// value is published and is skipped if the launch was superseded.
  ///
  /// Must be called from within a tokio runtime.
  pub fn launch_then<F>(&self, mut stream: ResourceStream<T>, on_success: F)
  where
    F: FnOnce(&T) + Send + 'static,
  {
    let mut task = self.inner.task();
    let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(previous) = task.take() {
      previous.abort();
    }
    self.inner.tx.send_replace(Some(Resource::Loading));

    let inner = Arc::clone(&self.inner);
    *task = Some(tokio::spawn(async move {
      let mut on_success = Some(on_success);
      while let Some(state) = stream.next().await {
        if state.is_loading() {
          continue;
        }
        if inner.generation.load(Ordering::SeqCst) != generation {
          trace!(generation, "dropping stale emission");
          return;
        }
        if let (Resource::Success(data), Some(callback)) = (&state, on_success.take()) {
          callback(data);
        }
        if !inner.publish(generation, state) {
          trace!(generation, "dropping stale emission");
          return;
        }
      }
    }));
  }

  /// Cancel any in-flight task and forget the current state.
  pub fn clear(&self) {
    let mut task = self.inner.task();
    self.inner.generation.fetch_add(1, Ordering::SeqCst);
    if let Some(previous) = task.take() {
      previous.abort();
    }
    self.inner.tx.send_replace(None);
  }

  pub fn get(&self) -> Option<Resource<T>> {
    self.inner.tx.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<Option<Resource<T>>> {
    self.inner.tx.subscribe()
  }

  /// Wait until the slot holds a terminal value (or nothing) and return it.
  pub async fn settled(&self) -> Option<Resource<T>> {
    let mut rx = self.subscribe();
    let state = rx
      .wait_for(|state| state.as_ref().map_or(true, Resource::is_terminal))
      .await
      .ok()?;
    state.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::repository::observe;
  use std::sync::atomic::AtomicBool;
  use std::time::Duration;
  use tokio::sync::oneshot;

  #[tokio::test]
  async fn loading_is_published_synchronously() {
    let slot = StateSlot::new();
    assert_eq!(slot.get(), None);

    slot.launch(observe::<i32, _>(async { Ok(7) }));
    assert_eq!(slot.get(), Some(Resource::Loading));

    assert_eq!(slot.settled().await, Some(Resource::Success(7)));
  }

  #[tokio::test]
  async fn errors_are_published() {
    let slot = StateSlot::new();
    slot.launch(observe::<i32, _>(async {
      Err(Error::InvalidInput("fallo".to_string()))
    }));
    assert_eq!(slot.settled().await, Some(Resource::Error("fallo".to_string())));
  }

  #[tokio::test]
  async fn newer_launch_wins_over_slow_older_one() {
    let slot = StateSlot::new();
    let (release, gate) = oneshot::channel::<()>();

    slot.launch(observe::<i32, _>(async move {
      let _ = gate.await;
      Ok(1)
    }));
    slot.launch(observe::<i32, _>(async { Ok(2) }));

    assert_eq!(slot.settled().await, Some(Resource::Success(2)));

    // The first task was aborted; releasing it must not change anything
    let _ = release.send(());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(slot.get(), Some(Resource::Success(2)));
  }

  #[tokio::test]
  async fn stale_generation_cannot_publish() {
    let slot = StateSlot::<i32>::new();
    slot.launch(observe(async { Ok(1) }));
    let stale = slot.inner.generation.load(Ordering::SeqCst);
    slot.launch(observe(async { Ok(2) }));

    assert!(!slot.inner.publish(stale, Resource::Success(99)));
    assert_eq!(slot.settled().await, Some(Resource::Success(2)));
  }

  #[tokio::test]
  async fn on_success_runs_before_value_is_visible() {
    let slot = StateSlot::new();
    let chained = StateSlot::<&'static str>::new();
    let ran = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&ran);
    let reload = chained.clone();
    slot.launch_then(observe::<(), _>(async { Ok(()) }), move |_| {
      flag.store(true, Ordering::SeqCst);
      reload.launch(observe(async { Ok("recargado") }));
    });

    assert_eq!(slot.settled().await, Some(Resource::Success(())));
    assert!(ran.load(Ordering::SeqCst));
    // The chained reload was already issued when the mutation settled
    assert!(chained.get().is_some());
    assert_eq!(chained.settled().await, Some(Resource::Success("recargado")));
  }

  #[tokio::test]
  async fn on_success_is_skipped_on_error() {
    let slot = StateSlot::new();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    slot.launch_then(
      observe::<(), _>(async { Err(Error::NotAuthenticated) }),
      move |_| flag.store(true, Ordering::SeqCst),
    );
    assert!(slot.settled().await.is_some_and(|s| s.is_error()));
    assert!(!ran.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn clear_cancels_and_resets() {
    let slot = StateSlot::new();
    let (_release, gate) = oneshot::channel::<()>();
    slot.launch(observe::<i32, _>(async move {
      let _ = gate.await;
      Ok(1)
    }));
    slot.clear();
    assert_eq!(slot.get(), None);
    assert_eq!(slot.settled().await, None);
  }
}
