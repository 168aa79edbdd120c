use std::{
    collections::HashMap,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::{debug, trace};
use oxiclean_core::{CanonicalPath, SpecKind};
use serde::Serialize;

use crate::{
    config::OutputFormat,
    rule::{MESSAGE_ID, RULE_NAME, RULE_TYPE},
    types::Finding,
};

const TOP_DEPENDENCIES: usize = 5;

fn display_path(root: &Path, file: &CanonicalPath) -> String {
    file.as_path().strip_prefix(root).unwrap_or(file.as_path()).to_string_lossy().to_string()
}

pub fn print_findings<W: Write>(
    writer: &mut W,
    findings: &[Finding],
    root: &Path,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => print_findings_tree(writer, findings, root),
        OutputFormat::Json => print_findings_json(writer, findings, root),
    }
}

pub fn print_no_findings_message<W: Write>(writer: &mut W, entries: usize) -> io::Result<()> {
    debug!("No findings");
    writeln!(
        writer,
        "{} No static external imports reachable from {} entry point(s)",
        "✓".green().bold(),
        entries
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_findings_tree<W: Write>(
    writer: &mut W,
    findings: &[Finding],
    root: &Path,
) -> io::Result<()> {
    debug!("Printing findings tree for {} findings", findings.len());
    writeln!(
        writer,
        "{} External dependencies imported statically from entry points ({})\n",
        "⚠".yellow().bold(),
        RULE_NAME.dimmed()
    )?;

    // Group by entry point, keeping traversal order
    let mut by_entry: Vec<(&str, Vec<&Finding>)> = Vec::new();
    for f in findings {
        match by_entry.iter_mut().find(|(entry, _)| *entry == f.entry_point) {
            Some((_, group)) => group.push(f),
            None => by_entry.push((f.entry_point.as_str(), vec![f])),
        }
    }

    for (entry, group) in &by_entry {
        trace!("Processing entry point: {} with {} findings", entry, group.len());
        let noun = if group.len() == 1 { "violation" } else { "violations" };
        writeln!(writer, "{} ({} {})", entry.blue(), group.len().to_string().red().bold(), noun)?;

        for (idx, finding) in group.iter().enumerate() {
            let prefix = if idx == group.len() - 1 { "└──" } else { "├──" };
            let position = format!(
                "{}:{}:{}",
                display_path(root, &finding.file),
                finding.location.line,
                finding.location.column
            );
            writeln!(writer, "{}  {}  {}", prefix.dimmed(), position, finding.message())?;
        }
        writeln!(writer)?;
    }

    print_summary(writer, findings)?;
    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, findings: &[Finding]) -> io::Result<()> {
    if findings.is_empty() {
        return Ok(());
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for f in findings {
        *counts.entry(f.dependency.as_str()).or_default() += 1;
    }
    let mut top: Vec<(&str, usize)> = counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let distinct = top.len();
    top.truncate(TOP_DEPENDENCIES);

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Total violations: {}", findings.len().to_string().yellow().bold())?;
    writeln!(writer, "  Distinct dependencies: {}", distinct.to_string().yellow())?;
    writeln!(writer, "  Top {} dependencies:", top.len())?;
    for (idx, (dependency, count)) in top.iter().enumerate() {
        let noun = if *count == 1 { "import" } else { "imports" };
        writeln!(writer, "    {}. {} ({} {})", idx + 1, dependency, count.to_string().red(), noun)?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Diagnostic<'a> {
    rule_id: &'static str,
    #[serde(rename = "type")]
    rule_type: &'static str,
    message_id: &'static str,
    message: String,
    data: DiagnosticData<'a>,
    entry_point: &'a str,
    kind: SpecKind,
    file: String,
    line: u32,
    column: u32,
}

#[derive(Serialize)]
struct DiagnosticData<'a> {
    dependency: &'a str,
}

pub fn print_findings_json<W: Write>(
    writer: &mut W,
    findings: &[Finding],
    root: &Path,
) -> io::Result<()> {
    let diagnostics: Vec<Diagnostic> = findings
        .iter()
        .map(|f| Diagnostic {
            rule_id: RULE_NAME,
            rule_type: RULE_TYPE,
            message_id: MESSAGE_ID,
            message: f.message(),
            data: DiagnosticData { dependency: &f.dependency },
            entry_point: &f.entry_point,
            kind: f.kind,
            file: display_path(root, &f.file),
            line: f.location.line,
            column: f.location.column,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &diagnostics)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
