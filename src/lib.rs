//! Deskpilot - desktop computer-use controller
//!
//! This library lets an external agent perceive and manipulate a desktop the
//! way a human does: by pixel coordinates, key names and screenshots. It never
//! uses accessibility APIs or application-specific hooks.
//!
//! ## Features
//!
//! - A uniform [`Computer`](computer::Computer) action vocabulary (click, hover,
//!   type, scroll, drag, navigate, key combinations)
//! - A screenshot and tracked URL returned after every action
//! - Platform-neutral key names mapped to platform shortcuts
//! - An MCP server exposing the actions as tools
//!
//! ## Example
//!
//! ```rust,ignore
//! use deskpilot::computer::Computer;
//! use deskpilot::desktop::DesktopController;
//!
//! let mut desktop = DesktopController::new(None, "https://www.google.com", "https://www.google.com")?;
//! let mut session = desktop.session()?;
//! session.navigate("example.com")?;
//! let state = session.key_combination(&["ControlOrMeta".into(), "f".into()])?;
//! assert_eq!(state.url(), "https://example.com");
//! ```

pub mod backend;
pub mod computer;
pub mod config;
pub mod core;
pub mod desktop;
pub mod error;
pub mod input;
pub mod screenshot;
pub mod server;
pub mod worker;

pub use computer::{Computer, Session};
pub use crate::core::{EnvState, ScreenSize, ScrollDirection};
pub use desktop::DesktopController;
pub use error::{ComputerError, Result};
