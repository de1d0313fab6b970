//! Tool infrastructure — catalog, dispatch, results, status parsing.
//!
//! The catalog owns tool metadata and argument contracts; the dispatcher
//! owns the handlers and turns every outcome into an `InvocationResult`.

pub mod catalog;
pub mod dispatch;
pub mod result;
pub mod status;

pub use catalog::{
    ParamDef, ParamType, StringFormat, ToolArgs, ToolCatalog, ToolDescriptor, ToolKind,
};
pub use dispatch::Dispatcher;
pub use result::{ContentBlock, InvocationResult};
