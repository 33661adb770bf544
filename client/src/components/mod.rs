//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render guarded layout and form fragments while reading/writing
//! shared state from Leptos context providers.

pub mod guardian_card;
pub mod protected_route;
