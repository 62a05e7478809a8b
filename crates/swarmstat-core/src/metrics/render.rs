//! Text exposition renderer.
//!
//! Pure function of a [`Snapshot`]: one `# HELP` (when described) and one
//! `# TYPE` line per family, then one line per series:
//! `name{a="x", b="y"} value`.

use std::fmt::Write;

use super::registry::{FamilySnapshot, Snapshot};

/// Content type served with rendered output.
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Separator between label pairs inside `{...}`.
const LABEL_SEP: &str = ", ";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// HELP text escapes backslash and newline only.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a sample value per the exposition format.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        // Display prints integral floats without a fractional part (120.0 -> "120").
        v.to_string()
    }
}

/// Render the label block, including braces. Empty label sets render as "".
pub fn format_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let body = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(LABEL_SEP);
    format!("{{{body}}}")
}

fn render_family(f: &FamilySnapshot, out: &mut String) {
    if let Some(help) = &f.help {
        let _ = writeln!(out, "# HELP {} {}", f.name, escape_help(help));
    }
    let _ = writeln!(out, "# TYPE {} {}", f.name, f.kind);
    for s in &f.samples {
        let _ = writeln!(
            out,
            "{}{} {}",
            f.name,
            format_labels(&s.labels),
            format_value(s.value)
        );
    }
}

/// Render a whole snapshot. An empty snapshot renders as an empty string.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for f in &snapshot.families {
        render_family(f, &mut out);
    }
    out
}
