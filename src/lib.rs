//! **hyprtile**, a one-shot BSP window tiler.
//!
//! On a single trigger, every eligible window on the primary monitor is
//! arranged into a non-overlapping grid: the work area is halved
//! recursively along its longer axis until there is one tile per window,
//! with a 1-unit gap at every split.  The layout is applied twice, a fixed
//! delay apart, because compositors do not always honor the first
//! application of geometry.
//!
//! # Architecture
//!
//! The crate is organised around three core traits:
//!
//! * [`traits::WindowSystem`] — abstracts window enumeration and geometry
//!   updates so the tiling logic is not coupled to any specific compositor.
//! * [`traits::Notifier`] — abstracts the one-shot user warning shown when
//!   windows outside the primary work area are excluded.
//! * [`traits::CommandSource`] — abstracts the transport that delivers the
//!   trigger so the main loop is not coupled to any specific IPC mechanism.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC) and
//! [`ipc`] (Unix-socket command listener).  The pure pieces, the
//! [`layout`] partition and the [`filter`] predicates, have no
//! dependencies on either.

pub mod command;
pub mod config;
pub mod filter;
pub mod hyprland;
pub mod ipc;
pub mod layout;
pub mod tiler;
pub mod traits;
pub mod types;
