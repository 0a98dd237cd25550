//! Compiles a short recorded trace and replays it against a toy machine.

use dynarec_core::{
    BlockCompiler, CpuState, OpcodeBus, OpcodeClass, ThumbHandlers,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const START: u32 = 0x0800_0000;

struct ToyMachine {
    rom: Vec<u16>,
}

impl OpcodeBus for ToyMachine {
    fn fetch16(&mut self, addr: u32) -> u16 {
        let index = (addr.wrapping_sub(START) / 2) as usize;
        self.rom.get(index).copied().unwrap_or(0)
    }
}

impl ThumbHandlers for ToyMachine {
    fn execute(&mut self, class: OpcodeClass, cpu: &mut CpuState) {
        println!(
            "  dispatch {:<9} opcode {:04X} at pc {:08X}",
            class.mnemonic(),
            cpu.pipeline.execute,
            cpu.pc()
        );
        if matches!(class, OpcodeClass::B | OpcodeClass::Beq) {
            cpu.pipeline.flush();
        }
    }
}

fn main() {
    let trace = [0x2005_u16, 0x1851, 0xE7FC];

    let compiler = BlockCompiler::new();
    let block = compiler.compile(START, &trace);

    let mut machine = ToyMachine {
        rom: trace.to_vec(),
    };
    let mut cpu = CpuState::default();
    cpu.thumb_mode = true;
    cpu.set_pc(START);

    println!("block at {START:08X}, {} recorded instructions", block.len());
    let exit = block.run(&mut cpu, &mut machine);
    println!("exit: {exit:?}, final pc {:08X}", cpu.pc());
}
