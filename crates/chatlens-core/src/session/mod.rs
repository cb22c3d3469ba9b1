//! Session lifecycle controller and notification fan-out.
//!
//! The [`SessionController`] owns the single [`SessionState`] of a linked
//! messaging account and is the only place it changes. Every transition is
//! published on the [`SessionBus`] so push subscribers see it immediately.
//!
//! [`SessionState`]: chatlens_types::session::SessionState

pub mod bus;
pub mod controller;
pub mod render;

pub use bus::{SessionBus, Subscription};
pub use controller::SessionController;
pub use render::PairingRenderer;
