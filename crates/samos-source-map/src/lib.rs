//! Source locations for samos configuration documents.
//!
//! Every node produced by the document reader carries a [`SourceInfo`] so
//! that diagnostics raised while loading configuration can point back at the
//! offending text.
//!
//! # Example
//!
//! ```rust
//! use samos_source_map::{LineIndex, SourceInfo};
//!
//! let source = "((app . ((verbose . #t))))\n";
//! let index = LineIndex::new(source);
//! let range = index.range(20, 22).unwrap();
//! let info = SourceInfo::new(range).with_file("app.scm");
//!
//! assert_eq!(info.to_string(), "app.scm:1:21");
//! ```

pub mod line_index;
pub mod source_info;
pub mod types;

pub use line_index::{LineIndex, offset_to_location};
pub use source_info::SourceInfo;
pub use types::{Location, Range};
