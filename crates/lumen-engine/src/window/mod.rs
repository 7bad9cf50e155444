mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
