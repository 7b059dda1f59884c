//! Output formatting for flow outcomes.
//!
//! Outcomes can be written as JSON, JSON Lines, or as human-readable text
//! where sections are printed under their configured titles.

use crate::config::SectionConfig;
use crate::flow::FlowOutcome;
use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Titled sections, or the raw text when no sections are available
    Text,
}

/// A writer that renders flow outcomes in one of the [`OutputFormat`]s.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, etc.)
    /// * `format` - Output format
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write one outcome.
    ///
    /// `sections` supplies titles and display order for text output; JSON
    /// formats ignore it.
    pub fn write_outcome(
        &mut self,
        outcome: &FlowOutcome,
        sections: &[SectionConfig],
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonLines => self.write_json(outcome)?,
            OutputFormat::Text => {
                let text = render_text(outcome, sections);
                writeln!(self.writer, "{}", text.trim_end())?;
                self.items_written += 1;
            }
        }
        Ok(())
    }

    /// Write any serializable item as JSON or JSONL.
    pub fn write_json<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            // JSONL is never pretty-printed (one object per line)
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Render an outcome for a terminal.
///
/// Sections print in configured order as `## Title` blocks; without
/// sections the raw model text is printed as-is.
pub fn render_text(outcome: &FlowOutcome, sections: &[SectionConfig]) -> String {
    let Some(values) = &outcome.sections else {
        return outcome.raw.clone();
    };

    let mut out = String::new();
    for section in sections {
        if let Some(value) = values.get(&section.key) {
            match &section.icon {
                Some(icon) => out.push_str(&format!("## [{icon}] {}\n\n", section.title)),
                None => out.push_str(&format!("## {}\n\n", section.title)),
            }
            out.push_str(value.trim());
            out.push_str("\n\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputType;
    use crate::structured::Sections;

    fn outcome(sections: Option<&[(&str, &str)]>) -> FlowOutcome {
        FlowOutcome {
            raw: "raw reply".to_string(),
            sections: sections.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<Sections>()
            }),
            output_type: OutputType::Sections,
        }
    }

    fn section(key: &str, title: &str, icon: Option<&str>) -> SectionConfig {
        SectionConfig {
            key: key.to_string(),
            title: title.to_string(),
            icon: icon.map(String::from),
        }
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_outcome(&outcome(None), &[]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"raw\":\"raw reply\""));
        assert!(output.contains("\"outputType\":\"sections\""));
        assert!(output.contains("\"sections\":null"));
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_outcome(&outcome(None), &[]).unwrap();
        writer
            .write_outcome(&outcome(Some(&[("a", "1")])), &[])
            .unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_text_renders_sections_in_configured_order() {
        let sections = [
            section("advice", "What to do", Some("bulb")),
            section("summary", "Summary", None),
        ];
        let text = render_text(
            &outcome(Some(&[("summary", "All good."), ("advice", " Water it. ")])),
            &sections,
        );
        assert_eq!(
            text,
            "## [bulb] What to do\n\nWater it.\n\n## Summary\n\nAll good.\n\n"
        );
    }

    #[test]
    fn test_text_falls_back_to_raw() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Text, false);
        writer
            .write_outcome(&outcome(None), &[section("summary", "Summary", None)])
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "raw reply\n");
    }
}
