//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `profile`). Each module owns one store
//! from the `session` crate plus a signal mirror that components read. The
//! stores publish on `watch` channels; [`mirror_into`] copies every committed
//! value into the signal so views re-render on loading and error transitions,
//! not just on completion.

pub mod auth;
pub mod profile;

use leptos::prelude::*;
use tokio::sync::watch;

/// Forward every value published on `rx` into `signal` until the store is dropped.
pub(crate) fn mirror_into<T>(rx: watch::Receiver<T>, signal: RwSignal<T>)
where
    T: Clone + Send + Sync + 'static,
{
    signal.set(rx.borrow().clone());
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let mut rx = rx;
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().clone();
            signal.set(value);
        }
    });
    #[cfg(not(feature = "hydrate"))]
    drop(rx);
}
