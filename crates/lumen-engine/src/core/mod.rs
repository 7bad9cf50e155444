//! The contract between the runtime and an application.
//!
//! The runtime owns the event loop and calls the [`App`] hooks; everything
//! an app may touch during a hook arrives through its context argument.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
