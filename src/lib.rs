//! opshell — a table-driven mapping engine for remote service operations.
//!
//! One generic pipeline executes every command in a declarative dispatch
//! table, replacing per-operation mapping code with per-operation metadata:
//!
//! - [`spec`] / [`registry`] — static [`OperationSpec`](spec::OperationSpec)
//!   tables: command name, wire operation, parameter declarations with
//!   request field paths, default output selector, confirmation impact.
//! - [`context`] — binds parameter values into a per-invocation context and
//!   resolves the output selector; binding errors abort here.
//! - [`confirm`] — the confirmation gate for mutating operations.
//! - [`assemble`] — copies context values onto the nested request tree and
//!   collapses optional groups with no set leaves to absent.
//! - [`transport`] / [`invoke`] — the generic invoke seam and the
//!   one-call-per-invocation state machine; transport and remote faults are
//!   captured into the [`CmdletOutput`](invoke::CmdletOutput), never thrown.
//! - [`select`] — projects the response (or an echoed input) into the
//!   externally visible result.
//! - [`engine`] — wires the stages together behind [`Engine`](engine::Engine).
//! - [`config`] — session, region, and credential resolution.
//! - [`cli`] — the thin command-line shell over the engine.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod context;
pub mod engine;
pub mod error;
pub mod invoke;
pub mod registry;
pub mod select;
pub mod spec;
pub mod transport;

pub use config::SessionConfig;
pub use engine::{Engine, Invocation};
pub use error::{EngineError, EngineResult, ServiceError};
pub use invoke::CmdletOutput;
pub use registry::OperationRegistry;
pub use select::OutputSelector;
pub use spec::{ConfirmImpact, OperationSpec, ParamKind, ParamSpec};
