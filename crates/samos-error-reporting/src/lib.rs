//! Structured diagnostic messages for samos.
//!
//! A bad property keeps its default and the load carries on, but what went
//! wrong still has to reach the user. Failures in the reader, store and
//! loader all turn into a [`DiagnosticMessage`] with tidyverse-style
//! structure:
//!
//! - a short **title** and an error **code** from the catalog (`S-3-1`, ...)
//! - a **problem** statement
//! - bulleted **details** (`✖` error, `ℹ` info, `•` note)
//! - **hints** for fixing the problem
//!
//! Messages render to plain text with [`DiagnosticMessage::to_text`] or to
//! JSON with [`DiagnosticMessage::to_json`].
//!
//! # Example
//!
//! ```
//! use samos_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::warning("Property skipped")
//!     .with_code("S-4-2")
//!     .problem("`int-prop` kept its default value")
//!     .add_detail("expected an integer, found a string")
//!     .build();
//!
//! assert!(msg.to_text(None).contains("Warning [S-4-2]: Property skipped"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
