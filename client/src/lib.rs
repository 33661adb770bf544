//! # client
//!
//! Leptos + WASM frontend for the learning platform's account area: the
//! login/register page and the protected profile editor.
//!
//! Session logic lives in the `session` crate. This crate supplies the
//! browser pieces it needs (a `localStorage` token store and a `gloo-net`
//! transport) and mirrors the session and profile stores into signals.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
