//! Diagnostic messages and their text and JSON renderings.

use samos_source_map::SourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`DiagnosticMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// Bullet style of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// `✖`, what is wrong
    Error,
    /// `ℹ`, surrounding facts
    Info,
    /// `•`, anything else
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// Text of a problem, detail or hint.
///
/// Serializes as `{"type": "plain" | "markdown", "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum MessageContent {
    Plain(String),
    /// Backticks mark keys and values.
    Markdown(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) | MessageContent::Markdown(s) => s,
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// One bulleted line under the problem statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// A structured report about a document or a store operation.
///
/// Rendered as a header line (`Kind [code]: title`), an optional location,
/// the problem statement, bulleted details and hints. Hints are phrased as questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Catalog code such as `S-3-1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// A message with only a title. [`crate::DiagnosticMessageBuilder`]
    /// fills in the rest.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
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

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Catalog subsystem of this message's code, if it has a known one.
    pub fn subsystem(&self) -> Option<&str> {
        self.code
            .as_deref()
            .and_then(crate::catalog::get_subsystem)
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Render as plain text:
    /// ```text
    /// Error [S-1-1]: title
    ///   --> settings.scm:2:9
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// • Note detail
    /// ? Hint
    /// ```
    ///
    /// When `source` holds the text the locations refer to, the header,
    /// problem and located details are drawn over the source by ariadne
    /// instead, followed by the unlocated details and the hints.
    ///
    /// ```
    /// use samos_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Unreadable File").with_code("S-1-4");
    /// assert_eq!(msg.to_text(None), "Error [S-1-4]: Unreadable File\n");
    /// ```
    pub fn to_text(&self, source: Option<&str>) -> String {
        let mut out = String::new();
        let context = source.and_then(|text| self.render_source_context(text));
        // Writing into a String cannot fail.
        let _ = match context {
            Some(context) => {
                out.push_str(&context);
                self.write_trailer(&mut out, false)
            }
            None => self.write_text(&mut out),
        };
        out
    }

    fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "{}", self.kind.label())?;
        if let Some(code) = &self.code {
            write!(out, " [{}]", code)?;
        }
        writeln!(out, ": {}", self.title)?;

        if let Some(location) = &self.location {
            writeln!(out, "  --> {}", location)?;
        }

        if let Some(problem) = &self.problem {
            writeln!(out, "{}", problem.as_str())?;
        }
        self.write_trailer(out, true)
    }

    /// Details and hints. Located details are skipped when ariadne has
    /// already drawn them.
    fn write_trailer(&self, out: &mut impl fmt::Write, located: bool) -> fmt::Result {
        for detail in &self.details {
            match &detail.location {
                Some(location) if located => {
                    writeln!(
                        out,
                        "{} {} (at {})",
                        detail.kind.bullet(),
                        detail.content.as_str(),
                        location
                    )?;
                }
                Some(_) => {}
                None => writeln!(out, "{} {}", detail.kind.bullet(), detail.content.as_str())?,
            }
        }

        for hint in &self.hints {
            writeln!(out, "? {}", hint.as_str())?;
        }
        Ok(())
    }

    /// Draw the message over `source` with ariadne, colour disabled.
    fn render_source_context(&self, source: &str) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let main = self
            .location
            .as_ref()
            .or_else(|| self.details.iter().find_map(|d| d.location.as_ref()))?;
        let file_id = main.file.clone().unwrap_or_else(|| "<input>".to_string());
        let main_span = char_span(source, main)?;

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
            DiagnosticKind::Note => (ReportKind::Advice, Color::Blue),
        };

        let mut report = Report::build(report_kind, file_id.clone(), main_span.start)
            .with_config(Config::default().with_color(false));

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        if self.location.is_some() {
            let message = self
                .problem
                .as_ref()
                .map_or(self.title.as_str(), MessageContent::as_str);
            report = report.with_label(
                Label::new((file_id.clone(), main_span))
                    .with_message(message)
                    .with_color(main_color),
            );
        } else if let Some(problem) = &self.problem {
            report = report.with_note(problem.as_str());
        }

        for detail in &self.details {
            let Some(location) = &detail.location else {
                continue;
            };
            if location.file != main.file {
                continue;
            }
            let Some(span) = char_span(source, location) else {
                continue;
            };
            let color = match detail.kind {
                DetailKind::Error => Color::Red,
                DetailKind::Info => Color::Cyan,
                DetailKind::Note => Color::Blue,
            };
            report = report.with_label(
                Label::new((file_id.clone(), span))
                    .with_message(detail.content.as_str())
                    .with_color(color),
            );
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file_id, Source::from(source)), &mut output)
            .ok()?;
        String::from_utf8(output).ok()
    }

    /// The message as JSON, in the same shape it deserializes from.
    ///
    /// ```
    /// use samos_error_reporting::DiagnosticMessage;
    ///
    /// let json = DiagnosticMessage::error("Unreadable File").with_code("S-1-4").to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["code"], "S-1-4");
    /// assert!(json.get("details").is_none());
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Ariadne counts in chars, locations count in bytes.
fn char_span(source: &str, location: &SourceInfo) -> Option<std::ops::Range<usize>> {
    let start = source.get(..location.start_offset())?.chars().count();
    let end = source.get(..location.end_offset())?.chars().count();
    Some(start..end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagnosticMessageBuilder;
    use samos_source_map::{LineIndex, Location, Range};

    fn skipped_int_prop() -> DiagnosticMessage {
        DiagnosticMessageBuilder::warning("Property Skipped")
            .with_code("S-4-2")
            .problem("`int-prop` kept its default value")
            .add_detail("expected Int, found String")
            .add_info("the default is 1")
            .add_note("other keys were still read")
            .add_hint("Drop the quotes around the number?")
            .build()
    }

    #[test]
    fn test_bare_message() {
        let msg = DiagnosticMessage::new(DiagnosticKind::Note, "Scope located");
        assert_eq!(msg.kind, DiagnosticKind::Note);
        assert!(msg.code.is_none() && msg.problem.is_none() && msg.location.is_none());
        assert!(msg.details.is_empty() && msg.hints.is_empty());
        assert_eq!(msg.to_text(None), "Note: Scope located\n");
    }

    #[test]
    fn test_constructors_set_kind() {
        assert!(DiagnosticMessage::error("e").is_error());
        assert_eq!(DiagnosticMessage::warning("w").kind, DiagnosticKind::Warning);
        assert!(!DiagnosticMessage::info("i").is_error());
    }

    #[test]
    fn test_subsystem_from_code() {
        let msg = DiagnosticMessage::error("Duplicate Key").with_code("S-3-1");
        assert_eq!(msg.subsystem(), Some("store"));
        assert_eq!(DiagnosticMessage::error("Uncoded").subsystem(), None);
    }

    #[test]
    fn test_text_rendering() {
        insta::assert_snapshot!(skipped_int_prop().to_text(None).trim_end(), @r"
        Warning [S-4-2]: Property Skipped
        `int-prop` kept its default value
        ✖ expected Int, found String
        ℹ the default is 1
        • other keys were still read
        ? Drop the quotes around the number?
        ");
    }

    #[test]
    fn test_detail_with_location() {
        let location = SourceInfo::new(Range {
            start: Location {
                offset: 100,
                row: 10,
                column: 5,
            },
            end: Location {
                offset: 110,
                row: 10,
                column: 15,
            },
        });
        let msg = DiagnosticMessageBuilder::error("Syntax Error")
            .add_detail_at("unexpected `)`", location.clone())
            .with_location(location)
            .build();

        let text = msg.to_text(None);
        assert!(text.contains("  --> 11:6\n"));
        assert!(text.contains("✖ unexpected `)` (at 11:6)"));
        assert!(!text.contains(" | "));
    }

    #[test]
    fn test_source_context_over_text() {
        let source = "((cfg .\n  ((int-prop . \"oops\"))))";
        let index = LineIndex::new(source);
        let location = SourceInfo::new(index.range(23, 29).unwrap()).with_file("cfg.scm");

        let msg = DiagnosticMessageBuilder::warning("Property Skipped")
            .with_code("S-4-2")
            .problem("`int-prop` kept its default value")
            .add_detail("expected Int, found String")
            .add_hint("Drop the quotes around the number?")
            .with_location(location)
            .build();
        let text = msg.to_text(Some(source));

        assert!(text.starts_with("Warning: [S-4-2] Property Skipped\n"));
        assert!(text.contains("cfg.scm:2:16"));
        assert!(text.contains("((int-prop . \"oops\"))))"));
        assert!(text.contains("`int-prop` kept its default value"));
        assert!(text.ends_with("✖ expected Int, found String\n? Drop the quotes around the number?\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_source_context_labels_details() {
        let source = "((cfg . ((a . 1)\n        (a . 2))))";
        let index = LineIndex::new(source);
        let first = SourceInfo::new(index.range(10, 11).unwrap()).with_file("cfg.scm");
        let second = SourceInfo::new(index.range(26, 27).unwrap()).with_file("cfg.scm");

        let msg = DiagnosticMessageBuilder::error("Duplicate Key")
            .with_code("S-3-1")
            .problem("`a` appears twice")
            .add_detail_at("first defined here", first)
            .with_location(second)
            .build();
        let text = msg.to_text(Some(source));

        assert!(text.starts_with("Error: [S-3-1] Duplicate Key\n"));
        assert!(text.contains("first defined here"));
        assert!(!text.contains("(at "));
    }

    #[test]
    fn test_source_without_location_falls_back() {
        let msg = skipped_int_prop();
        assert_eq!(msg.to_text(Some("((a . 1))")), msg.to_text(None));
    }

    #[test]
    fn test_json_shape() {
        let json = skipped_int_prop().to_json();

        assert_eq!(json["kind"], "warning");
        assert_eq!(json["code"], "S-4-2");
        assert_eq!(json["problem"]["type"], "markdown");
        assert_eq!(json["details"][0]["kind"], "error");
        assert_eq!(json["details"][2]["kind"], "note");
        assert_eq!(json["details"][1]["content"]["content"], "the default is 1");
        assert_eq!(json["hints"][0]["content"], "Drop the quotes around the number?");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_json_reads_back() {
        let msg = DiagnosticMessageBuilder::error("Unreadable File")
            .with_code("S-1-4")
            .with_location(SourceInfo::default().with_file("cfg.scm"))
            .build();

        let json = msg.to_json();
        assert_eq!(json["location"]["file"], "cfg.scm");
        let back: DiagnosticMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
