//! Status lines for the human reading stderr. Stdout carries only the
//! serialized catalog.

use std::io::Write;

use console::Style;

/// Width of the right-aligned label gutter.
const LABEL_WIDTH: usize = 12;

/// Label colour of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A completed step: bold green.
    Done,
    /// Something the reader should look at: bold yellow.
    Attention,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Done => Style::new().green().bold(),
            Tone::Attention => Style::new().yellow().bold(),
        }
    }
}

/// Render `label` right-aligned in the gutter, followed by `message`.
///
/// The label is padded before styling so escape codes never count towards
/// the width.
pub fn format_status(tone: Tone, label: &str, message: &str) -> String {
    let padded = format!("{label:>width$}", width = LABEL_WIDTH);
    format!("{} {message}", tone.style().apply_to(padded))
}

fn emit(tone: Tone, label: &str, message: &str) {
    let line = format_status(tone, label, message);
    let _ = writeln!(std::io::stderr().lock(), "{line}");
}

/// `    Filtered 2 package(s), 5 bundle(s)`
pub fn status(label: &str, message: &str) {
    emit(Tone::Done, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Attention, label, message);
}
