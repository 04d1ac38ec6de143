#![forbid(unsafe_code)]

//! Interactive runtime: event queue, component tree, and the terminal
//! loop.
//!
//! A program implements [`Component`] (or wraps a closure with
//! [`renderer`]) and hands the root to an [`InteractiveLoop`]:
//!
//! ```no_run
//! use weft_dom::{border, text};
//! use weft_runtime::{InteractiveLoop, renderer};
//!
//! let mut root = renderer(|| border(text("hello")));
//! InteractiveLoop::new().run(&mut root).expect("terminal session");
//! ```
//!
//! Input is decoded on a dedicated thread and flows through an
//! [`EventQueue`]; the main loop drains whole batches and re-renders
//! once per batch. Handlers receive a [`LoopContext`] to request exit
//! or post events from other threads.

pub mod component;
pub mod input;
pub mod interactive;
pub mod queue;

pub use component::{Component, Container, Renderer, renderer};
pub use input::{InputSource, ScriptedInput};
#[cfg(unix)]
pub use input::TtyInput;
pub use interactive::{InteractiveLoop, LoopContext, LoopState};
pub use queue::EventQueue;
