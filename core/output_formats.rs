use crate::context::{ChangeReport, Document};
use crate::error::{AppError, Result};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tagged text with a table of contents.
    #[default]
    Xml,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(OutputFormat::Xml),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown output format '{}'. Use xml, json or yaml.",
                other
            ))),
        }
    }
}

pub fn render_document(document: &Document, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Xml => document_to_xml(document),
        OutputFormat::Json => serialize_context_to_json(document, pretty),
        OutputFormat::Yaml => serialize_context_to_yaml(document),
    }
}

pub fn render_changes(report: &ChangeReport, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Xml => changes_to_xml(report),
        OutputFormat::Json => serialize_context_to_json(report, pretty),
        OutputFormat::Yaml => serialize_context_to_yaml(report),
    }
}

pub fn serialize_context_to_json<T: Serialize>(context: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(context).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(context).map_err(AppError::JsonSerialize)
    }
}

pub fn serialize_context_to_yaml<T: Serialize>(context: &T) -> Result<String> {
    serde_yml::to_string(context).map_err(AppError::YamlError)
}

// File contents go in verbatim; only attribute and path text is escaped.
fn document_to_xml(document: &Document) -> Result<String> {
    let mut out = String::with_capacity(document.total_bytes() + 256);
    write!(out, "<documents title=\"{}\"", escape(document.title.as_str()))?;
    if let Some(ts) = document.generated_at {
        write!(out, " generated_at=\"{}\"", ts.to_rfc3339())?;
    }
    out.push_str(">\n<table_of_contents>\n");
    for file in &document.files {
        writeln!(out, "- {}", escape(file.name.as_str()))?;
    }
    out.push_str("</table_of_contents>\n");

    for (i, file) in document.files.iter().enumerate() {
        writeln!(out, "<document index=\"{}\">", i + 1)?;
        writeln!(out, "<source>{}</source>", escape(file.name.as_str()))?;
        out.push_str("<document_content>\n");
        push_block(&mut out, &file.content);
        out.push_str("</document_content>\n</document>\n");
    }
    out.push_str("</documents>\n");
    Ok(out)
}

fn changes_to_xml(report: &ChangeReport) -> Result<String> {
    let mut out = String::new();
    write!(out, "<changes title=\"{}\"", escape(report.title.as_str()))?;
    if let Some(ts) = report.generated_at {
        write!(out, " generated_at=\"{}\"", ts.to_rfc3339())?;
    }
    out.push_str(">\n");

    for record in report.changes.values() {
        writeln!(out, "<file path=\"{}\">", escape(record.path.as_str()))?;
        out.push_str("<full_file>\n");
        push_block(&mut out, &record.full_file);
        out.push_str("</full_file>\n");
        for (i, section) in record.diff_sections.iter().enumerate() {
            writeln!(out, "<diff_section index=\"{}\">", i + 1)?;
            out.push_str("<before>\n");
            push_lines(&mut out, &section.before);
            out.push_str("</before>\n<after>\n");
            push_lines(&mut out, &section.after);
            out.push_str("</after>\n</diff_section>\n");
        }
        out.push_str("</file>\n");
    }
    out.push_str("</changes>\n");
    Ok(out)
}

fn push_block(out: &mut String, content: &str) {
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}
