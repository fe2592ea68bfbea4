//! Arithmetic, logical and comparison commands.

use super::{ModuleContext, Translator, internal_label, operands, pop_d};
use crate::asm::{AsmBuffer, at, label};
use crate::error::Result;
use crate::memory::SCRATCH_REGISTER;
use crate::parser::Instruction;

/// Arithmetic/Logical operations (9 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add, // x + y
    Sub, // x - y
    Neg, // -x
    Eq,  // x == y
    Gt,  // x > y
    Lt,  // x < y
    And, // x & y
    Or,  // x | y
    Not, // !x
}

impl ArithmeticOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(ArithmeticOp::Add),
            "sub" => Some(ArithmeticOp::Sub),
            "neg" => Some(ArithmeticOp::Neg),
            "eq" => Some(ArithmeticOp::Eq),
            "gt" => Some(ArithmeticOp::Gt),
            "lt" => Some(ArithmeticOp::Lt),
            "and" => Some(ArithmeticOp::And),
            "or" => Some(ArithmeticOp::Or),
            "not" => Some(ArithmeticOp::Not),
            _ => None,
        }
    }
}

/// Arithmetic code generator.
///
/// Owns the counter that keeps comparison labels unique for a whole run.
#[derive(Debug, Default)]
pub struct ArithmeticTranslator {
    comparison_counter: usize,
}

impl ArithmeticTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_binary(&self, operation: &str, out: &mut AsmBuffer) {
        // y in D, A at x
        pop_d(out);
        out.emit("A=A-1");
        out.emit(format!("M={}", operation));
    }

    fn write_unary(&self, operation: &str, out: &mut AsmBuffer) {
        out.emit_all(["@SP", "A=M-1"]);
        out.emit(format!("M={}", operation));
    }

    fn write_comparison(&mut self, jump: &str, out: &mut AsmBuffer) {
        let id = self.comparison_counter;
        self.comparison_counter += 1;

        let op = jump.trim_start_matches('J');
        let true_label = internal_label(op, "TRUE", id);
        let end_label = internal_label(op, "END", id);

        if jump == "JEQ" {
            // A wrapped difference is still zero exactly when x == y
            pop_d(out);
            out.emit_all(["A=A-1", "D=M-D"]);
        } else {
            write_ordering(op, id, out);
        }
        out.emit(at(&true_label));
        out.emit(format!("D;{}", jump));

        // false: x slot = 0
        out.emit_all(["@SP", "A=M-1", "M=0"]);
        out.emit(at(&end_label));
        out.emit("0;JMP");

        // true: x slot = -1
        out.emit(label(&true_label));
        out.emit_all(["@SP", "A=M-1", "M=-1"]);
        out.emit(label(&end_label));
    }
}

/// Pop y and leave D with the sign of `x - y`, x still on top.
///
/// `x - y` overflows 16 bits when the signs differ, so then the sign of x
/// decides and only same-sign operands are subtracted.
fn write_ordering(op: &str, id: usize, out: &mut AsmBuffer) {
    let x_negative = internal_label(op, "XNEG", id);
    let same_sign = internal_label(op, "SAME", id);
    let decided = internal_label(op, "ORDER", id);

    // R13 = y, D = x
    pop_d(out);
    out.emit(at(SCRATCH_REGISTER));
    out.emit("M=D");
    out.emit_all(["@SP", "A=M-1", "D=M"]);
    out.emit(at(&x_negative));
    out.emit("D;JLT");

    // x >= 0
    out.emit(at(SCRATCH_REGISTER));
    out.emit("D=M");
    out.emit(at(&same_sign));
    out.emit("D;JGE");
    out.emit("D=1");
    out.emit(at(&decided));
    out.emit("0;JMP");

    // x < 0
    out.emit(label(&x_negative));
    out.emit(at(SCRATCH_REGISTER));
    out.emit("D=M");
    out.emit(at(&same_sign));
    out.emit("D;JLT");
    out.emit("D=-1");
    out.emit(at(&decided));
    out.emit("0;JMP");

    out.emit(label(&same_sign));
    out.emit(at(SCRATCH_REGISTER));
    out.emit("D=M");
    out.emit_all(["@SP", "A=M-1", "D=M-D"]);
    out.emit(label(&decided));
}

impl Translator for ArithmeticTranslator {
    fn try_translate(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
        out: &mut AsmBuffer,
    ) -> Result<bool> {
        let Some(op) = ArithmeticOp::from_name(instruction.name()) else {
            return Ok(false);
        };
        operands::<0>(instruction, ctx)?;

        match op {
            ArithmeticOp::Add => self.write_binary("D+M", out),
            ArithmeticOp::Sub => self.write_binary("M-D", out),
            ArithmeticOp::And => self.write_binary("D&M", out),
            ArithmeticOp::Or => self.write_binary("D|M", out),
            ArithmeticOp::Neg => self.write_unary("-M", out),
            ArithmeticOp::Not => self.write_unary("!M", out),
            ArithmeticOp::Eq => self.write_comparison("JEQ", out),
            ArithmeticOp::Gt => self.write_comparison("JGT", out),
            ArithmeticOp::Lt => self.write_comparison("JLT", out),
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VMError;
    use crate::parser::parse_line;

    fn run(translator: &mut ArithmeticTranslator, line: &str) -> Result<AsmBuffer> {
        let mut ctx = ModuleContext::new("Test").unwrap();
        let mut out = AsmBuffer::new();
        let instruction = parse_line(line, 1).unwrap();
        assert!(translator.try_translate(&instruction, &mut ctx, &mut out)?);
        Ok(out)
    }

    #[test]
    fn test_translate_add() {
        let out = run(&mut ArithmeticTranslator::new(), "add").unwrap();
        assert_eq!(out.lines(), ["@SP", "AM=M-1", "D=M", "A=A-1", "M=D+M"]);
    }

    #[test]
    fn test_binary_and_unary_ops() {
        let mut translator = ArithmeticTranslator::new();
        let cases = [
            ("sub", "M=M-D"),
            ("and", "M=D&M"),
            ("or", "M=D|M"),
            ("neg", "M=-M"),
            ("not", "M=!M"),
        ];
        for (line, last) in cases {
            let out = run(&mut translator, line).unwrap();
            assert_eq!(out.lines().last().map(String::as_str), Some(last));
        }
    }

    #[test]
    fn test_comparison_labels_are_unique() {
        let mut translator = ArithmeticTranslator::new();
        let first = run(&mut translator, "eq").unwrap().to_text();
        let second = run(&mut translator, "lt").unwrap().to_text();

        assert!(first.contains("@EQ$TRUE$0\nD;JEQ"));
        assert!(first.contains("(EQ$END$0)"));
        assert!(second.contains("@LT$TRUE$1\nD;JLT"));
        assert!(second.contains("(LT$END$1)"));
    }

    #[test]
    fn test_equality_subtracts_directly() {
        let out = run(&mut ArithmeticTranslator::new(), "eq").unwrap();
        assert_eq!(
            &out.lines()[..7],
            ["@SP", "AM=M-1", "D=M", "A=A-1", "D=M-D", "@EQ$TRUE$0", "D;JEQ"]
        );
    }

    #[test]
    fn test_ordering_checks_signs_before_subtracting() {
        let asm = run(&mut ArithmeticTranslator::new(), "gt").unwrap().to_text();

        let sign_check = asm.find("@GT$XNEG$0\nD;JLT").unwrap();
        let subtract = asm.find("(GT$SAME$0)\n@R13\nD=M\n@SP\nA=M-1\nD=M-D\n(GT$ORDER$0)").unwrap();
        assert!(sign_check < subtract);
        assert!(asm.contains("D=1\n@GT$ORDER$0"));
        assert!(asm.contains("D=-1\n@GT$ORDER$0"));
        assert!(asm.contains("(GT$ORDER$0)\n@GT$TRUE$0\nD;JGT"));
    }

    #[test]
    fn test_declines_stack_instructions() {
        let mut ctx = ModuleContext::new("Test").unwrap();
        let mut out = AsmBuffer::new();
        let instruction = parse_line("push constant 1", 1).unwrap();
        let handled = ArithmeticTranslator::new()
            .try_translate(&instruction, &mut ctx, &mut out)
            .unwrap();
        assert!(!handled);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rejects_arguments() {
        let result = run(&mut ArithmeticTranslator::new(), "add 1");
        assert!(matches!(result, Err(VMError::UnexpectedArgument { .. })));
    }
}
