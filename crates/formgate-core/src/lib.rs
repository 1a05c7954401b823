//! formgate-core — form lifecycle and tool dispatch
//!
//! The transport-free heart of the gateway: a per-session [`FormStore`]
//! that owns fixed-schema forms through a create → update → submit
//! lifecycle, and a [`ToolDispatcher`] that maps named tool calls onto
//! store operations and folds every failure into a uniform [`Envelope`].
//!
//! Nothing here performs I/O; any caller that can produce a
//! `(name, args)` pair (a typed UI, transcribed speech, an LLM
//! function call) can drive a session.

pub mod envelope;
pub mod form;
pub mod store;
pub mod tools;

pub use envelope::{Envelope, EnvelopeStatus};
pub use form::{Field, FieldKind, Form, FormStatus};
pub use store::{FormError, FormStore, SubmitOutcome, SubmitPolicy};
pub use tools::{ToolDefinition, ToolDispatcher, ToolKind, tool_definitions};
