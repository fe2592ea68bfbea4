//! `label`, `goto` and `if-goto`.

use super::{ModuleContext, SCOPE_SEPARATOR, Translator, label_name, operands, pop_d};
use crate::asm::{AsmBuffer, at, label};
use crate::error::Result;
use crate::parser::Instruction;

/// Program-flow code generator.
///
/// Labels are scoped as `scope$label`, where scope is the enclosing
/// function (or the module outside any function).
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgramFlowTranslator;

impl ProgramFlowTranslator {
    pub fn new() -> Self {
        Self
    }
}

fn scoped(ctx: &ModuleContext, name: &str) -> String {
    format!("{}{}{}", ctx.scope(), SCOPE_SEPARATOR, name)
}

impl Translator for ProgramFlowTranslator {
    fn try_translate(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
        out: &mut AsmBuffer,
    ) -> Result<bool> {
        if !matches!(instruction.name(), "label" | "goto" | "if-goto") {
            return Ok(false);
        }

        let [name] = operands::<1>(instruction, ctx)?;
        let target = scoped(ctx, label_name(name, instruction, ctx)?);

        match instruction.name() {
            "label" => out.emit(label(target)),
            "goto" => {
                out.emit(at(target));
                out.emit("0;JMP");
            }
            _ => {
                // if-goto jumps when the popped value is non-zero
                pop_d(out);
                out.emit(at(target));
                out.emit("D;JNE");
            }
        }

        Ok(true)
    }
}
