//! Commonly used items in one import.
//!
//! ```rust
//! use fstr::prelude::*;
//!
//! let engine = Engine::builder().colors(ColorChoice::Never).build();
//! let args = Args::new().with(Value::seq([1, 2])).named("label", "pair");
//! assert_eq!(engine.render("{label}: {0}", &args), "pair: [1, 2]");
//! ```

pub use crate::{
    args, fstr, render, render_safe, try_render, write_fstr, writeln_fstr, Args, ColorChoice,
    Engine, FormatSpec, Record, RenderError, TypeKey, Value, ValueKind,
};

#[cfg(feature = "time")]
pub use crate::Timestamp;
