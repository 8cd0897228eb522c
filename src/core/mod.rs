//! Core value types shared by every computer backend

pub mod direction;
pub mod keys;
pub mod state;

pub use direction::{DEFAULT_SCROLL_MAGNITUDE, ScrollDelta, ScrollDirection};
pub use keys::{KeyBindings, Platform, normalize_key};
pub use state::{EnvState, ScreenSize};
