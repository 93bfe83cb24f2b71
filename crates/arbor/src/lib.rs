//! Arbor: an Elm-architecture framework for terminal user interfaces.
//!
//! Applications describe their state as a `Model`, the things that can happen
//! to it as a `Message`, and implement [`Program`](runtime::Program) to tie
//! them together. Every frame the runtime asks the program for a fresh
//! [`View`](view::View) tree, lays it out, renders it into a
//! [`Buffer`](buffer::Buffer) and pushes the result to a terminal backend.
//!
//! View trees hold no state of their own. Continuity between frames comes
//! from the buffer's keyed store: a node that renders at the same
//! [`ViewKey`](key::ViewKey) in consecutive frames sees the values it stored
//! the frame before.
//!
//! # Module Organization
//!
//! - [`view`] - the `Node` trait, `View` and all combinators
//! - [`buffer`] - the per-frame render target
//! - [`layout`] - size negotiation
//! - [`runtime`] - the program loop and background commands
//! - [`backend`] - terminal adapters

#![warn(missing_docs)]

pub mod backend;
pub mod buffer;
pub mod command;
pub mod error;
pub mod event;
pub mod key;
pub mod layout;
pub mod log;
pub mod prelude;
pub mod runtime;
pub mod style;
pub mod text;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod view;

pub use arbor_geom as geom;
pub use buffer::{Buffer, TermBuf};
pub use command::{CancelHandle, Command, Deliver};
pub use error::{Error, Result};
pub use key::ViewKey;
pub use runtime::{Exit, Program, Runtime, RuntimeConfig, Update};
pub use view::{Node, Outcome, View};
