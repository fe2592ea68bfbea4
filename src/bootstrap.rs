//! Bootstrap code generation for VM initialization.
//!
//! Sets up the stack and transfers control to `Sys.init`.

use crate::asm::{AsmBuffer, at};
use crate::codegen::call::write_call;

/// Initial stack pointer.
pub const STACK_BASE: u16 = 256;

/// Entry point called by the bootstrap.
pub const ENTRY_FUNCTION: &str = "Sys.init";

/// Return label of the bootstrap call. Doubles as the halt loop should
/// `Sys.init` ever return.
pub const BOOTSTRAP_RETURN_LABEL: &str = "Sys.init$ret$bootstrap";

/// Emit VM bootstrap code.
///
/// 1. `SP = 256`
/// 2. `call Sys.init 0`
/// 3. Spin on the return label should `Sys.init` ever return
pub fn write_bootstrap(out: &mut AsmBuffer) {
    out.emit(at(STACK_BASE));
    out.emit_all(["D=A", "@SP", "M=D"]);

    write_call(ENTRY_FUNCTION, 0, BOOTSTRAP_RETURN_LABEL, out);

    out.emit(at(BOOTSTRAP_RETURN_LABEL));
    out.emit("0;JMP");
}
