//! Minimal Hack CPU for checking what generated assembly does at runtime.

#![allow(dead_code)]

use std::collections::HashMap;

use hack_vm_translator::{CodeWriter, TranslateOptions};

pub const SP: usize = 0;
pub const LCL: usize = 1;
pub const ARG: usize = 2;
pub const THIS: usize = 3;
pub const THAT: usize = 4;

const RAM_SIZE: usize = 32768;
const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Load(i16),
    Compute {
        dest: String,
        /// comp with `M` rewritten to `A`
        comp: String,
        reads_memory: bool,
        jump: Option<String>,
    },
}

#[derive(Debug)]
pub struct HackMachine {
    rom: Vec<Op>,
    pub ram: Vec<i16>,
    pc: usize,
    a: i16,
    d: i16,
    symbols: HashMap<String, u16>,
}

fn predefined_symbols() -> HashMap<String, u16> {
    let mut symbols: HashMap<String, u16> = [
        ("SP", 0),
        ("LCL", 1),
        ("ARG", 2),
        ("THIS", 3),
        ("THAT", 4),
        ("SCREEN", 16384),
        ("KBD", 24576),
    ]
    .into_iter()
    .map(|(name, addr)| (name.to_string(), addr))
    .collect();
    for r in 0..16u16 {
        symbols.insert(format!("R{}", r), r);
    }
    symbols
}

fn compute(comp: &str, d: i16, y: i16) -> i16 {
    match comp {
        "0" => 0,
        "1" => 1,
        "-1" => -1,
        "D" => d,
        "A" => y,
        "!D" => !d,
        "!A" => !y,
        "-D" => d.wrapping_neg(),
        "-A" => y.wrapping_neg(),
        "D+1" => d.wrapping_add(1),
        "A+1" => y.wrapping_add(1),
        "D-1" => d.wrapping_sub(1),
        "A-1" => y.wrapping_sub(1),
        "D+A" | "A+D" => d.wrapping_add(y),
        "D-A" => d.wrapping_sub(y),
        "A-D" => y.wrapping_sub(d),
        "D&A" | "A&D" => d & y,
        "D|A" | "A|D" => d | y,
        other => panic!("unsupported comp: {}", other),
    }
}

impl HackMachine {
    /// Assemble `asm` (labels, variables, comments) into ROM.
    pub fn load(asm: &str) -> Self {
        let lines: Vec<&str> = asm
            .lines()
            .map(|line| line.split("//").next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .collect();

        let mut symbols = predefined_symbols();
        let mut rom_address = 0u16;
        for line in &lines {
            match line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                Some(name) => {
                    assert!(
                        symbols.insert(name.to_string(), rom_address).is_none(),
                        "duplicate label {}",
                        name
                    );
                }
                None => rom_address += 1,
            }
        }

        let mut next_variable = 16u16;
        let mut rom = Vec::new();
        for line in lines {
            if line.starts_with('(') {
                continue;
            }
            if let Some(value) = line.strip_prefix('@') {
                let addr = match value.parse::<u16>() {
                    Ok(n) => {
                        assert!(n <= 0x7FFF, "A-instruction out of range: {}", n);
                        n
                    }
                    Err(_) => *symbols.entry(value.to_string()).or_insert_with(|| {
                        next_variable += 1;
                        next_variable - 1
                    }),
                };
                rom.push(Op::Load(addr as i16));
                continue;
            }

            let (dest, rest) = line.split_once('=').unwrap_or(("", line));
            let (comp, jump) = match rest.split_once(';') {
                Some((comp, jump)) => (comp, Some(jump.to_string())),
                None => (rest, None),
            };
            rom.push(Op::Compute {
                dest: dest.to_string(),
                comp: comp.replace('M', "A"),
                reads_memory: comp.contains('M'),
                jump,
            });
        }

        Self {
            rom,
            ram: vec![0; RAM_SIZE],
            pc: 0,
            a: 0,
            d: 0,
            symbols,
        }
    }

    fn address(&self) -> usize {
        self.a as u16 as usize
    }

    /// RAM address the assembler gave `symbol`.
    pub fn symbol(&self, symbol: &str) -> Option<usize> {
        self.symbols.get(symbol).map(|addr| *addr as usize)
    }

    pub fn halted(&self) -> bool {
        self.pc >= self.rom.len()
    }

    pub fn step(&mut self) {
        match self.rom[self.pc].clone() {
            Op::Load(value) => {
                self.a = value;
                self.pc += 1;
            }
            Op::Compute {
                dest,
                comp,
                reads_memory,
                jump,
            } => {
                let old_a = self.a;
                let y = if reads_memory {
                    self.ram[self.address()]
                } else {
                    self.a
                };
                let value = compute(&comp, self.d, y);

                if dest.contains('M') {
                    let addr = self.address();
                    self.ram[addr] = value;
                }
                if dest.contains('A') {
                    self.a = value;
                }
                if dest.contains('D') {
                    self.d = value;
                }

                let taken = match jump.as_deref() {
                    None => false,
                    Some("JMP") => true,
                    Some("JEQ") => value == 0,
                    Some("JNE") => value != 0,
                    Some("JGT") => value > 0,
                    Some("JGE") => value >= 0,
                    Some("JLT") => value < 0,
                    Some("JLE") => value <= 0,
                    Some(other) => panic!("unsupported jump: {}", other),
                };
                self.pc = if taken {
                    old_a as u16 as usize
                } else {
                    self.pc + 1
                };
            }
        }
    }

    /// Run until execution falls off the end of ROM.
    pub fn run(&mut self) {
        let mut steps = 0;
        while !self.halted() {
            self.step();
            steps += 1;
            assert!(steps < STEP_LIMIT, "program did not terminate");
        }
    }

    /// Run exactly `steps` instructions or until halted.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            if self.halted() {
                break;
            }
            self.step();
        }
    }

    /// Stack contents from 256 up to SP.
    pub fn stack(&self) -> &[i16] {
        &self.ram[256..self.ram[SP] as usize]
    }
}

/// Standard test layout: SP=256, LCL=300, ARG=400, THIS=3000, THAT=3010.
pub fn standard_setup(machine: &mut HackMachine) {
    machine.ram[SP] = 256;
    machine.ram[LCL] = 300;
    machine.ram[ARG] = 400;
    machine.ram[THIS] = 3000;
    machine.ram[THAT] = 3010;
}

/// Translate modules in order with one shared writer.
pub fn assemble(modules: &[(&str, &str)], options: TranslateOptions) -> String {
    let mut writer = CodeWriter::new(options);
    for (name, source) in modules {
        writer
            .write_module(name, source.lines())
            .expect("translation failed");
    }
    writer.into_output().to_text()
}

/// Translate one module, load it with the standard layout and run it.
pub fn run_module(source: &str, module: &str) -> HackMachine {
    let asm = hack_vm_translator::translate(source, module).expect("translation failed");
    let mut machine = HackMachine::load(&asm);
    standard_setup(&mut machine);
    machine.run();
    machine
}
