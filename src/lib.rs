//! Hack VM Translator - Stack VM to Hack Assembly
//!
//! Lowers the stack-based VM instruction set into Hack assembly for the
//! 16-bit Hack computer.
//!
//! # Architecture
//!
//! ```text
//! VM source → Parser → [Stack | Arithmetic | Flow | Call] → AsmBuffer
//! ```
//!
//! - **Parser**: splits lines into [`Instruction`]s, dropping comments
//! - **Memory**: segment addressing rules
//! - **CodeGen**: one [`Translator`](codegen::Translator) per instruction category
//! - **Writer**: chains the generators over whole modules
//!
//! # Example
//!
//! ```
//! use hack_vm_translator::translate;
//!
//! let asm = translate("push constant 7\npush constant 8\nadd", "SimpleAdd").unwrap();
//! assert!(asm.starts_with("@7\nD=A\n"));
//! ```

pub mod asm;
pub mod bootstrap;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod parser;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use crate::asm::AsmBuffer;
pub use crate::error::{Result, VMError};
pub use crate::parser::{Instruction, parse};
pub use crate::writer::CodeWriter;

/// When to emit the `Sys.init` bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bootstrap {
    /// Only for directories containing `Sys.vm`.
    #[default]
    Auto,
    Always,
    Never,
}

/// Translation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub bootstrap: Bootstrap,
    /// Precede each translated instruction with a `// <instruction>` comment.
    pub annotate: bool,
}

/// Translate one module of VM source with default options.
///
/// `module_name` prefixes the module's static symbols. No bootstrap is
/// emitted.
///
/// ```
/// use hack_vm_translator::translate;
///
/// assert!(translate("push static 3", "Foo").unwrap().contains("@Foo.3"));
/// assert!(translate("invalid command", "Foo").is_err());
/// ```
pub fn translate(source: &str, module_name: &str) -> Result<String> {
    translate_with_options(source, module_name, &TranslateOptions::default())
}

/// Translate one module of VM source.
///
/// Only [`Bootstrap::Always`] adds bootstrap code to a single module.
pub fn translate_with_options(
    source: &str,
    module_name: &str,
    options: &TranslateOptions,
) -> Result<String> {
    let mut writer = CodeWriter::new(*options);
    if options.bootstrap == Bootstrap::Always {
        writer.write_bootstrap();
    }
    writer.write_module(module_name, source.lines())?;
    Ok(writer.into_output().to_text())
}

/// Translate a single `.vm` file.
pub fn translate_file(path: &Path, options: &TranslateOptions) -> Result<String> {
    let mut writer = CodeWriter::new(*options);
    if options.bootstrap == Bootstrap::Always {
        writer.write_bootstrap();
    }
    writer.write_module_from_file(path)?;
    Ok(writer.into_output().to_text())
}

/// Translate every `.vm` file in a directory into one program.
///
/// Files are processed in name order, sharing one [`CodeWriter`] so label
/// counters stay unique across modules.
pub fn translate_directory(dir_path: &Path, options: &TranslateOptions) -> Result<String> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir_path)
        .map_err(|e| VMError::FileRead {
            path: dir_path.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if vm_files.is_empty() {
        return Err(VMError::NoVmFiles {
            path: dir_path.display().to_string(),
        });
    }
    vm_files.sort();

    let has_sys = vm_files
        .iter()
        .any(|path| path.file_name().is_some_and(|name| name == "Sys.vm"));
    debug!(
        dir = %dir_path.display(),
        files = vm_files.len(),
        has_sys,
        "translating directory"
    );

    let mut writer = CodeWriter::new(*options);
    match options.bootstrap {
        Bootstrap::Auto if has_sys => writer.write_bootstrap(),
        Bootstrap::Always => {
            if !has_sys {
                warn!(dir = %dir_path.display(), "bootstrap forced but no Sys.vm found");
            }
            writer.write_bootstrap();
        }
        _ => {}
    }

    for vm_file in &vm_files {
        writer.write_module_from_file(vm_file)?;
    }

    Ok(writer.into_output().to_text())
}

/// Determine the output filename for a given input.
///
/// - Single file: `Input.vm` -> `Input.asm`
/// - Directory: `dir/` -> `dir/dir.asm`
pub fn output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let dir_name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.join(format!("{}.asm", dir_name))
    } else {
        input.with_extension("asm")
    }
}
