//! Per-key merge outcomes and where they are reported.
//!
//! Merging a document never fails as a whole. Each key produces a
//! [`MergeEvent`] that is handed to a [`DiagnosticSink`]; callers choose
//! whether events are logged ([`TracingSink`]), collected for inspection
//! (`Vec<MergeEvent>`), or turned into diagnostics
//! (`Vec<DiagnosticMessage>`).

use crate::types::ValueTag;
use samos_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use samos_sexp::EvaluatorError;
use samos_source_map::SourceInfo;
use std::fmt;

/// What happened to one key during a merge.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The document value replaced the default.
    Updated,
    /// The key holds a nested store; only one level is merged.
    NestedNotMerged,
    /// The scope has no usable entry for the key.
    KeyMissing(EvaluatorError),
    /// The entry exists but does not decode to a scalar.
    Undecodable {
        error: EvaluatorError,
        /// The entry's value as written
        value: String,
    },
    /// The entry decodes to a different kind than the default.
    KindMismatch { expected: ValueTag, got: ValueTag },
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Updated => f.write_str("updated"),
            MergeOutcome::NestedNotMerged => f.write_str("nested stores are not merged"),
            MergeOutcome::KeyMissing(error) => write!(f, "{}", error),
            MergeOutcome::Undecodable { error, value } => write!(f, "`{}`: {}", value, error),
            MergeOutcome::KindMismatch { expected, got } => {
                write!(f, "expected {}, found {}", expected, got)
            }
        }
    }
}

/// A merge outcome for one key.
#[derive(Debug)]
pub struct MergeEvent {
    pub key: String,
    pub outcome: MergeOutcome,
    /// Where the relevant document text is, when the evaluator tracks it.
    pub location: Option<SourceInfo>,
}

impl MergeEvent {
    pub fn new(key: impl Into<String>, outcome: MergeOutcome) -> Self {
        MergeEvent {
            key: key.into(),
            outcome,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<SourceInfo>) -> Self {
        self.location = location;
        self
    }

    /// Whether the key kept its default because of a problem in the
    /// document.
    pub fn is_skip(&self) -> bool {
        matches!(
            self.outcome,
            MergeOutcome::KeyMissing(_)
                | MergeOutcome::Undecodable { .. }
                | MergeOutcome::KindMismatch { .. }
        )
    }

    /// A diagnostic describing the event, or `None` for a plain update.
    pub fn to_diagnostic(&self) -> Option<DiagnosticMessage> {
        let key = &self.key;
        let builder = match &self.outcome {
            MergeOutcome::Updated => return None,
            MergeOutcome::NestedNotMerged => DiagnosticMessageBuilder::info("Nested Store Not Merged")
                .with_code("S-4-3")
                .problem(format!("`{}` is a nested store and keeps its default", key))
                .add_note("only one level of properties is read from a document"),
            MergeOutcome::KeyMissing(EvaluatorError::KeyNotFound(_)) => skipped(key)
                .add_detail(format!("the scope has no entry for `{}`", key))
                .add_hint(format!("Add `({} . value)` to the scope to override it?", key)),
            MergeOutcome::KeyMissing(error) => skipped(key).add_detail(error.to_string()),
            MergeOutcome::Undecodable { error, value } => skipped(key)
                .add_detail(format!("`{}` cannot be used as a property value", value))
                .add_info(error.to_string()),
            MergeOutcome::KindMismatch { expected, got } => {
                let builder = skipped(key)
                    .add_detail(format!("expected {}, found {}", expected, got));
                if *expected == ValueTag::Bool && *got == ValueTag::Symbol {
                    builder.add_hint("Booleans are written `#t` and `#f`?")
                } else {
                    builder
                }
            }
        };
        Some(builder.with_optional_location(self.location.clone()).build())
    }
}

fn skipped(key: &str) -> DiagnosticMessageBuilder {
    DiagnosticMessageBuilder::warning("Property Skipped")
        .with_code("S-4-2")
        .problem(format!("`{}` kept its default value", key))
}

/// Receives one event per key of a merge.
pub trait DiagnosticSink {
    fn report(&mut self, event: MergeEvent);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, event: MergeEvent) {
        (**self).report(event);
    }
}

/// Collects every event.
impl DiagnosticSink for Vec<MergeEvent> {
    fn report(&mut self, event: MergeEvent) {
        self.push(event);
    }
}

/// Collects skipped keys as diagnostics.
impl DiagnosticSink for Vec<DiagnosticMessage> {
    fn report(&mut self, event: MergeEvent) {
        if event.is_skip() {
            self.extend(event.to_diagnostic());
        }
    }
}

/// Logs events through `tracing`: skips at `warn`, updates at `info`,
/// nested stores at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, event: MergeEvent) {
        let key = &event.key;
        let location = event
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match &event.outcome {
            MergeOutcome::Updated => {
                tracing::info!(key = %key, location = %location, "updated property")
            }
            MergeOutcome::NestedNotMerged => {
                tracing::debug!(key = %key, "nested store keeps its default")
            }
            outcome => tracing::warn!(
                key = %key,
                location = %location,
                reason = %outcome,
                "property kept its default value"
            ),
        }
    }
}
