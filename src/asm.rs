//! Append-only assembly output.

use std::fmt;

/// Ordered sequence of Hack assembly lines.
///
/// Only appends are exposed: lines already written are never rewritten,
/// reordered or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsmBuffer {
    lines: Vec<String>,
}

impl AsmBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    #[inline]
    pub fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append several lines in order.
    pub fn emit_all<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Move every line of `other` onto the end of this buffer.
    pub fn append(&mut self, other: AsmBuffer) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render one instruction per line, newline terminated.
    pub fn to_text(&self) -> String {
        let size = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut text = String::with_capacity(size);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for AsmBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// `@value` A-instruction.
#[inline]
pub fn at(value: impl fmt::Display) -> String {
    format!("@{}", value)
}

/// `(label)` pseudo-instruction.
#[inline]
pub fn label(name: impl fmt::Display) -> String {
    format!("({})", name)
}
