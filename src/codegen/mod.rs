//! Hack assembly code generation.
//!
//! Each instruction category has its own [`Translator`]. A translator either
//! recognizes an instruction by name and appends its assembly, or declines
//! with `Ok(false)` without touching the output, so callers can chain them.

pub mod arithmetic;
pub mod call;
pub mod flow;
pub mod stack;

pub use arithmetic::ArithmeticTranslator;
pub use call::FunctionCallTranslator;
pub use flow::ProgramFlowTranslator;
pub use stack::StackTranslator;

use std::fmt;

use crate::asm::AsmBuffer;
use crate::error::{Result, VMError};
use crate::parser::Instruction;

/// Joins a label's scope to its name. Reserved: no module, function or
/// label name may contain it.
pub const SCOPE_SEPARATOR: char = '$';

/// Symbols the Hack assembler predefines besides `R0`..`R15`.
const PREDEFINED_SYMBOLS: [&str; 7] = ["SP", "LCL", "ARG", "THIS", "THAT", "SCREEN", "KBD"];

/// An instruction-category code generator.
pub trait Translator {
    /// Translate `instruction` if this generator recognizes its name.
    ///
    /// Returns `Ok(true)` after appending assembly to `out`, `Ok(false)` for
    /// instructions belonging to another category. `out` is left unchanged
    /// on `Ok(false)` and on `Err`.
    fn try_translate(
        &mut self,
        instruction: &Instruction,
        ctx: &mut ModuleContext,
        out: &mut AsmBuffer,
    ) -> Result<bool>;
}

/// Naming scope for the module being translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    module_name: String,
    current_function: Option<String>,
}

impl ModuleContext {
    /// Create a context for `module_name`.
    ///
    /// The name prefixes static symbols (`Module.index`) and module-level
    /// labels (`Module$label`), so it must be a symbol fragment without `.`
    /// or `$`.
    pub fn new(module_name: &str) -> Result<Self> {
        if !is_valid_symbol(module_name)
            || module_name.contains('.')
            || module_name.contains(SCOPE_SEPARATOR)
        {
            return Err(VMError::InvalidModuleName {
                name: module_name.to_string(),
            });
        }

        Ok(Self {
            module_name: module_name.to_string(),
            current_function: None,
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub fn enter_function(&mut self, name: &str) {
        self.current_function = Some(name.to_string());
    }

    /// Prefix for labels: the current function, else the module.
    pub fn scope(&self) -> &str {
        self.current_function.as_deref().unwrap_or(&self.module_name)
    }
}

/// Check a Hack assembly symbol: letters, digits, `_ . $ :`, no leading digit.
pub fn is_valid_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':');

    !first.is_ascii_digit() && allowed(first) && chars.all(allowed)
}

/// Whether the assembler already defines `name` (`SP`, `R13`, `KBD`, ...).
pub fn is_predefined_symbol(name: &str) -> bool {
    PREDEFINED_SYMBOLS.contains(&name)
        || name.strip_prefix('R').is_some_and(|digits| {
            matches!(digits.parse::<u8>(), Ok(r) if r <= 15 && r.to_string() == digits)
        })
}

/// Whether `name` has the `Module.index` shape of a static variable.
pub fn is_static_shaped(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, index)| {
        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Label owned by the translator itself: `prefix$kind$id`.
///
/// User labels carry exactly one separator and function names none, so the
/// two-separator form never collides with either.
pub(crate) fn internal_label(prefix: &str, kind: &str, id: impl fmt::Display) -> String {
    format!("{prefix}{SCOPE_SEPARATOR}{kind}{SCOPE_SEPARATOR}{id}")
}

// =============================================================================
// Stack primitives (D is the working register)
// =============================================================================

/// `*SP = D; SP++`
pub(crate) fn push_d(out: &mut AsmBuffer) {
    out.emit_all(["@SP", "A=M", "M=D", "@SP", "M=M+1"]);
}

/// `SP--; D = *SP`. Leaves A pointing at the popped cell.
pub(crate) fn pop_d(out: &mut AsmBuffer) {
    out.emit_all(["@SP", "AM=M-1", "D=M"]);
}

// =============================================================================
// Argument helpers
// =============================================================================

/// Exactly `N` arguments of `instruction`.
pub(crate) fn operands<'a, const N: usize>(
    instruction: &'a Instruction,
    ctx: &ModuleContext,
) -> Result<[&'a str; N]> {
    let args = instruction.arguments();

    if args.len() < N {
        return Err(VMError::MissingArgument {
            line: instruction.line_number(),
            module: ctx.module_name().to_string(),
            command: instruction.name().to_string(),
        });
    }
    if let Some(extra) = args.get(N) {
        return Err(VMError::UnexpectedArgument {
            line: instruction.line_number(),
            module: ctx.module_name().to_string(),
            command: instruction.name().to_string(),
            argument: extra.clone(),
        });
    }

    Ok(std::array::from_fn(|i| args[i].as_str()))
}

/// Parse a non-negative numeric argument.
pub(crate) fn parse_number(
    text: &str,
    instruction: &Instruction,
    ctx: &ModuleContext,
) -> Result<u16> {
    text.parse::<u16>().map_err(|_| VMError::MalformedIndex {
        line: instruction.line_number(),
        module: ctx.module_name().to_string(),
        value: text.to_string(),
    })
}

/// Validate a label name: a Hack symbol without the scope separator.
pub(crate) fn label_name<'a>(
    name: &'a str,
    instruction: &Instruction,
    ctx: &ModuleContext,
) -> Result<&'a str> {
    if is_valid_symbol(name) && !name.contains(SCOPE_SEPARATOR) {
        Ok(name)
    } else {
        Err(VMError::InvalidSymbol {
            line: instruction.line_number(),
            module: ctx.module_name().to_string(),
            name: name.to_string(),
        })
    }
}

/// Validate a function name.
///
/// Beyond the label rules, it must not shadow an assembler symbol or a
/// static variable, since both are addressed with the same `@name`.
pub(crate) fn function_name<'a>(
    name: &'a str,
    instruction: &Instruction,
    ctx: &ModuleContext,
) -> Result<&'a str> {
    let name = label_name(name, instruction, ctx)?;

    if is_predefined_symbol(name) || is_static_shaped(name) {
        return Err(VMError::ReservedSymbol {
            line: instruction.line_number(),
            module: ctx.module_name().to_string(),
            name: name.to_string(),
        });
    }
    Ok(name)
}
