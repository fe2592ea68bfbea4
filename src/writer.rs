//! Module orchestration.
//!
//! [`CodeWriter`] owns the output buffer and the ordered list of
//! instruction-category generators, and feeds whole modules through them.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::TranslateOptions;
use crate::asm::AsmBuffer;
use crate::bootstrap::write_bootstrap;
use crate::codegen::{
    ArithmeticTranslator, FunctionCallTranslator, ModuleContext, ProgramFlowTranslator,
    StackTranslator, Translator,
};
use crate::error::{Result, VMError};
use crate::parser::{Instruction, parse};

/// Translates modules into one shared assembly buffer.
pub struct CodeWriter {
    output: AsmBuffer,
    translators: Vec<Box<dyn Translator>>,
    options: TranslateOptions,
}

impl CodeWriter {
    pub fn new(options: TranslateOptions) -> Self {
        Self {
            output: AsmBuffer::new(),
            translators: vec![
                Box::new(StackTranslator::new()),
                Box::new(ArithmeticTranslator::new()),
                Box::new(ProgramFlowTranslator::new()),
                Box::new(FunctionCallTranslator::new()),
            ],
            options,
        }
    }

    /// Translate one instruction.
    ///
    /// Generators are tried in order; the first to recognize the instruction
    /// wins. Nothing is appended unless translation succeeds.
    pub fn write_instruction(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
    ) -> Result<()> {
        trace!(line = instruction.line_number(), %instruction, "translating");

        let mut scratch = AsmBuffer::new();
        for translator in &mut self.translators {
            if translator.try_translate(instruction, ctx, &mut scratch)? {
                if self.options.annotate {
                    self.output.emit(format!("// {}", instruction));
                }
                self.output.append(scratch);
                return Ok(());
            }
        }

        Err(VMError::UnknownInstruction {
            line: instruction.line_number(),
            module: ctx.module_name().to_string(),
            instruction: instruction.to_string(),
        })
    }

    /// Translate every line of module `module_name`.
    pub fn write_module<I, S>(&mut self, module_name: &str, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = ModuleContext::new(module_name)?;
        let instructions = parse(lines);
        debug!(
            module = module_name,
            instructions = instructions.len(),
            "translating module"
        );

        for instruction in &instructions {
            self.write_instruction(instruction, &mut ctx)?;
        }
        Ok(())
    }

    /// Translate a `.vm` file; the module name is the file stem.
    pub fn write_module_from_file(&mut self, path: &Path) -> Result<()> {
        let module_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| VMError::InvalidPath {
                path: path.display().to_string(),
            })?;

        let source = fs::read_to_string(path).map_err(|e| VMError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!(path = %path.display(), "read module source");
        self.write_module(module_name, source.lines())
    }

    /// Emit start-up code calling `Sys.init`.
    pub fn write_bootstrap(&mut self) {
        debug!("emitting bootstrap");
        write_bootstrap(&mut self.output);
    }

    pub fn output(&self) -> &AsmBuffer {
        &self.output
    }

    pub fn into_output(self) -> AsmBuffer {
        self.output
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(TranslateOptions::default())
    }
}
