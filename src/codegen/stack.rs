//! `push` / `pop` across the eight memory segments.
//!
//! The instruction is resolved to a [`Location`] before anything is emitted,
//! so a malformed push/pop never leaves partial assembly behind.

use super::{ModuleContext, Translator, operands, parse_number, pop_d, push_d};
use crate::asm::{AsmBuffer, at};
use crate::error::{Result, VMError};
use crate::memory::{Address, Location, SCRATCH_REGISTER, Segment};
use crate::parser::Instruction;

/// Segment code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Push,
    Pop,
}

impl StackTranslator {
    pub fn new() -> Self {
        Self
    }

    fn resolve(instruction: &Instruction, ctx: &ModuleContext) -> Result<Location> {
        let [segment_name, index_text] = operands::<2>(instruction, ctx)?;

        let segment: Segment = segment_name
            .parse()
            .map_err(|_| VMError::UnknownSegment {
                line: instruction.line_number(),
                module: ctx.module_name().to_string(),
                segment: segment_name.to_string(),
            })?;

        let index = parse_number(index_text, instruction, ctx)?;

        Location::resolve(segment, index, ctx.module_name()).map_err(|source| {
            VMError::IndexOutOfRange {
                line: instruction.line_number(),
                module: ctx.module_name().to_string(),
                source,
            }
        })
    }
}

impl Translator for StackTranslator {
    fn try_translate(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
        out: &mut AsmBuffer,
    ) -> Result<bool> {
        let direction = match instruction.name() {
            "push" => Direction::Push,
            "pop" => Direction::Pop,
            _ => return Ok(false),
        };

        let location = Self::resolve(instruction, ctx)?;

        match direction {
            Direction::Push => write_push(&location, out),
            Direction::Pop => {
                let address = location.into_address().ok_or_else(|| VMError::PopToConstant {
                    line: instruction.line_number(),
                    module: ctx.module_name().to_string(),
                })?;
                write_pop(&address, out);
            }
        }

        Ok(true)
    }
}

/// Load the value at `location` into D, then push D.
fn write_push(location: &Location, out: &mut AsmBuffer) {
    match location {
        Location::Constant(value) => {
            out.emit(at(value));
            out.emit("D=A");
        }
        Location::Memory(Address::Based { base, offset }) => {
            // A = RAM[base] + offset
            out.emit(at(offset));
            out.emit("D=A");
            out.emit(at(base));
            out.emit_all(["A=D+M", "D=M"]);
        }
        Location::Memory(Address::Register(register)) => {
            out.emit(at(register));
            out.emit("D=M");
        }
        Location::Memory(Address::Fixed(addr)) => {
            out.emit(at(addr));
            out.emit("D=M");
        }
        Location::Memory(Address::Static(symbol)) => {
            out.emit(at(symbol));
            out.emit("D=M");
        }
    }
    push_d(out);
}

/// Pop into D, then store D at `address`.
fn write_pop(address: &Address, out: &mut AsmBuffer) {
    match address {
        Address::Based { base, offset } => {
            // Destination must be computed before SP moves: R13 = RAM[base] + offset
            out.emit(at(offset));
            out.emit("D=A");
            out.emit(at(base));
            out.emit("D=D+M");
            out.emit(at(SCRATCH_REGISTER));
            out.emit("M=D");
            pop_d(out);
            out.emit(at(SCRATCH_REGISTER));
            out.emit_all(["A=M", "M=D"]);
        }
        Address::Register(register) => {
            pop_d(out);
            out.emit(at(register));
            out.emit("M=D");
        }
        Address::Fixed(addr) => {
            pop_d(out);
            out.emit(at(addr));
            out.emit("M=D");
        }
        Address::Static(symbol) => {
            pop_d(out);
            out.emit(at(symbol));
            out.emit("M=D");
        }
    }
}
