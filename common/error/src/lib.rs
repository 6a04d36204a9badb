//! Error primitives shared across the climux workspace.
//!
//! Each crate defines its own snafu enum, annotated with
//! [`stack_trace_debug`], and implements [`ErrorExt`] to map variants to a
//! [`StatusCode`].

mod ext;
mod status_code;

pub use climux_stack_trace_macro::stack_trace_debug;
pub use ext::BoxedError;
pub use ext::ErrorExt;
pub use ext::PlainError;
pub use ext::boxed;
pub use snafu::Location;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use status_code::StatusMeta;
