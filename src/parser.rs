//! VM source tokenizer.
//!
//! Turns raw source lines into [`Instruction`]s. No instruction-set
//! validation happens here: deciding what a name means is the job of the
//! code generators.

use std::fmt;

/// One parsed VM command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    line_number: usize,
    name: String,
    arguments: Vec<String>,
}

impl Instruction {
    pub fn new(line_number: usize, name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            line_number,
            name: name.into(),
            arguments,
        }
    }

    /// 1-based line in the source text.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for argument in &self.arguments {
            write!(f, " {}", argument)?;
        }
        Ok(())
    }
}

/// Characters separating tokens within a line. Other whitespace, such as
/// U+00A0, is part of a token.
const TOKEN_SEPARATORS: [char; 2] = [' ', '\t'];

/// Strip comments and surrounding whitespace from a line
fn clean_line(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

/// Parse a single line of VM code.
///
/// Returns `None` for blank and comment-only lines.
pub fn parse_line(line: &str, line_number: usize) -> Option<Instruction> {
    let mut tokens = clean_line(line)
        .split(TOKEN_SEPARATORS)
        .filter(|token| !token.is_empty());
    let name = tokens.next()?;
    let arguments = tokens.map(str::to_string).collect();

    Some(Instruction::new(line_number, name, arguments))
}

/// Parse a sequence of source lines into instructions.
///
/// Every input line advances the line counter, including skipped ones, so
/// each instruction reports its position in the source text.
pub fn parse<I, S>(lines: I) -> Vec<Instruction>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| parse_line(line.as_ref(), index + 1))
        .collect()
}
