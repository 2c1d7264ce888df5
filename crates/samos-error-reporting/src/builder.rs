//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse structure: start from a kind and a
//! title, then add a problem statement, details and hints.

use crate::diagnostic::{
    DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent,
};
use samos_source_map::SourceInfo;

/// Builder for [`DiagnosticMessage`].
///
/// ```
/// use samos_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Duplicate Key")
///     .with_code("S-3-1")
///     .problem("`int-prop` is already registered")
///     .add_hint("Use `set` to replace an existing value?")
///     .build();
///
/// assert_eq!(msg.code.as_deref(), Some("S-3-1"));
/// assert_eq!(msg.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn note(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Note, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement. A second call replaces the first.
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error detail (`✖`).
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), None)
    }

    /// Add an error detail pointing at a source location.
    pub fn add_detail_at(self, detail: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), Some(location))
    }

    /// Add an info detail (`ℹ`).
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info.into(), None)
    }

    /// Add a note detail (`•`).
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note.into(), None)
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Set the location only if one is given.
    pub fn with_optional_location(mut self, location: Option<SourceInfo>) -> Self {
        if location.is_some() {
            self.message.location = location;
        }
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: MessageContent,
        location: Option<SourceInfo>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_kinds() {
        assert_eq!(
            DiagnosticMessageBuilder::error("e").build().kind,
            DiagnosticKind::Error
        );
        assert_eq!(
            DiagnosticMessageBuilder::warning("w").build().kind,
            DiagnosticKind::Warning
        );
        assert_eq!(
            DiagnosticMessageBuilder::info("i").build().kind,
            DiagnosticKind::Info
        );
        assert_eq!(
            DiagnosticMessageBuilder::note("n").build().kind,
            DiagnosticKind::Note
        );
    }

    #[test]
    fn test_details_keep_order_and_kind() {
        let msg = DiagnosticMessageBuilder::error("Kinds")
            .add_info("first")
            .add_detail("second")
            .add_note("third")
            .build();

        let kinds: Vec<_> = msg.details.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DetailKind::Info, DetailKind::Error, DetailKind::Note]
        );
        assert_eq!(msg.details[1].content.as_str(), "second");
    }

    #[test]
    fn test_detail_with_location() {
        let location = SourceInfo::default().with_file("cfg.scm");
        let msg = DiagnosticMessageBuilder::warning("Located")
            .add_detail_at("here", location.clone())
            .build();

        assert_eq!(msg.details[0].location, Some(location));
        assert!(msg.location.is_none());
    }

    #[test]
    fn test_optional_location() {
        let msg = DiagnosticMessageBuilder::error("None")
            .with_optional_location(None)
            .build();
        assert!(msg.location.is_none());

        let msg = DiagnosticMessageBuilder::error("Some")
            .with_optional_location(Some(SourceInfo::default()))
            .build();
        assert!(msg.location.is_some());
    }

    #[test]
    fn test_problem_replaced() {
        let msg = DiagnosticMessageBuilder::error("Twice")
            .problem("old")
            .problem("new")
            .build();
        assert_eq!(msg.problem.unwrap().as_str(), "new");
    }
}
