//! `function`, `call` and `return`.

use super::{
    ModuleContext, Translator, function_name, internal_label, operands, parse_number, pop_d,
    push_d,
};
use crate::asm::{AsmBuffer, at, label};
use crate::error::{Result, VMError};
use crate::memory::MAX_A_VALUE;
use crate::parser::Instruction;

/// Registers saved by `call`, in push order.
const SAVED_FRAME: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

/// Function-call code generator.
///
/// Owns the counter that keeps return-address labels unique for a run.
#[derive(Debug, Default)]
pub struct FunctionCallTranslator {
    call_counter: usize,
}

impl FunctionCallTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_function(&self, name: &str, num_locals: u16, out: &mut AsmBuffer) {
        out.emit(label(name));

        // Locals start out as zero
        if num_locals > 0 {
            out.emit("D=0");
            for _ in 0..num_locals {
                push_d(out);
            }
        }
    }

    fn write_return(&self, out: &mut AsmBuffer) {
        // R13 = frame = LCL
        out.emit_all(["@LCL", "D=M", "@R13", "M=D"]);

        // R14 = return address = *(frame - 5), read before *ARG is overwritten
        out.emit_all(["@5", "A=D-A", "D=M", "@R14", "M=D"]);

        // *ARG = pop()
        pop_d(out);
        out.emit_all(["@ARG", "A=M", "M=D"]);

        // SP = ARG + 1
        out.emit_all(["@ARG", "D=M+1", "@SP", "M=D"]);

        // THAT, THIS, ARG, LCL = *(frame - 1..4)
        for register in SAVED_FRAME.iter().rev() {
            out.emit_all(["@R13", "AM=M-1", "D=M"]);
            out.emit(at(register));
            out.emit("M=D");
        }

        out.emit_all(["@R14", "A=M", "0;JMP"]);
    }
}

/// Emit the calling sequence for `function` with a caller-chosen return label.
pub(crate) fn write_call(function: &str, num_args: u16, return_label: &str, out: &mut AsmBuffer) {
    out.emit(at(return_label));
    out.emit("D=A");
    push_d(out);

    for register in SAVED_FRAME {
        out.emit(at(register));
        out.emit("D=M");
        push_d(out);
    }

    // ARG = SP - num_args - 5
    out.emit_all(["@SP", "D=M"]);
    out.emit(at(u32::from(num_args) + 5));
    out.emit_all(["D=D-A", "@ARG", "M=D"]);

    // LCL = SP
    out.emit_all(["@SP", "D=M", "@LCL", "M=D"]);

    out.emit(at(function));
    out.emit("0;JMP");
    out.emit(label(return_label));
}

impl Translator for FunctionCallTranslator {
    fn try_translate(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
        out: &mut AsmBuffer,
    ) -> Result<bool> {
        match instruction.name() {
            "function" => {
                let [name, count] = operands::<2>(instruction, ctx)?;
                let name = function_name(name, instruction, ctx)?;
                let num_locals = parse_number(count, instruction, ctx)?;

                ctx.enter_function(name);
                self.write_function(name, num_locals, out);
            }
            "call" => {
                let [name, count] = operands::<2>(instruction, ctx)?;
                let name = function_name(name, instruction, ctx)?;
                let num_args = parse_number(count, instruction, ctx)?;
                // ARG offset is loaded as an A-instruction literal
                if u32::from(num_args) + 5 > u32::from(MAX_A_VALUE) {
                    return Err(VMError::MalformedIndex {
                        line: instruction.line_number(),
                        module: ctx.module_name().to_string(),
                        value: count.to_string(),
                    });
                }

                let return_label = internal_label(ctx.scope(), "ret", self.call_counter);
                self.call_counter += 1;
                write_call(name, num_args, &return_label, out);
            }
            "return" => {
                operands::<0>(instruction, ctx)?;
                self.write_return(out);
            }
            _ => return Ok(false),
        }

        Ok(true)
    }
}
