use crate::state::pipeline::PipelineState;

/// Number of architecturally visible registers in the emulated register file.
pub const REGISTER_COUNT: usize = 16;

/// Index of the program counter within the register file.
pub const PC_INDEX: usize = 15;

/// Width in bytes of one THUMB instruction word.
pub const INSTRUCTION_WIDTH: u32 = 2;

/// Processor state a compiled block reads and advances.
///
/// The block driver and the instruction handlers share exactly this object;
/// there is no process-wide singleton and only one routine touches it at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuState {
    /// General registers `r0..r15`; `r15` is the program counter.
    pub regs: [u32; REGISTER_COUNT],
    /// True while the processor executes in THUMB state.
    pub thumb_mode: bool,
    /// Non-zero when any system fault or halt status flag is raised.
    pub system_status: u32,
    /// True when an interrupt request is awaiting service.
    pub irq_pending: bool,
    /// Three-stage instruction pipeline latches and validity mask.
    pub pipeline: PipelineState,
}

impl CpuState {
    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.regs[PC_INDEX]
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u32) {
        self.regs[PC_INDEX] = value;
    }

    /// Advances the program counter by one instruction width.
    pub const fn advance_pc(&mut self) {
        self.regs[PC_INDEX] = self.regs[PC_INDEX].wrapping_add(INSTRUCTION_WIDTH);
    }

    /// True when an asynchronous event must be honored before the next
    /// pipeline tick.
    #[must_use]
    pub const fn event_pending(&self) -> bool {
        self.irq_pending || self.system_status != 0
    }

    /// True when the entry assumptions of a compiled THUMB block hold.
    #[must_use]
    pub const fn thumb_ready(&self) -> bool {
        self.thumb_mode && self.system_status == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{CpuState, INSTRUCTION_WIDTH, PC_INDEX, REGISTER_COUNT};

    #[test]
    fn program_counter_is_register_fifteen() {
        assert_eq!(REGISTER_COUNT, 16);
        assert_eq!(PC_INDEX, 15);

        let mut cpu = CpuState::default();
        cpu.set_pc(0x0800_0120);
        assert_eq!(cpu.pc(), 0x0800_0120);
        assert_eq!(cpu.regs[PC_INDEX], 0x0800_0120);
    }

    #[test]
    fn advance_pc_steps_one_instruction_width() {
        let mut cpu = CpuState::default();
        cpu.set_pc(0x0800_0000);

        cpu.advance_pc();
        cpu.advance_pc();
        assert_eq!(cpu.pc(), 0x0800_0000 + 2 * INSTRUCTION_WIDTH);
    }

    #[test]
    fn advance_pc_wraps_at_the_address_space_boundary() {
        let mut cpu = CpuState::default();
        cpu.set_pc(u32::MAX - 1);

        cpu.advance_pc();
        assert_eq!(cpu.pc(), 0);
    }

    #[test]
    fn event_pending_covers_irq_and_status_flags() {
        let mut cpu = CpuState::default();
        assert!(!cpu.event_pending());

        cpu.irq_pending = true;
        assert!(cpu.event_pending());

        cpu.irq_pending = false;
        cpu.system_status = 0x2;
        assert!(cpu.event_pending());
    }

    #[test]
    fn thumb_ready_requires_thumb_mode_and_clear_status() {
        let mut cpu = CpuState::default();
        assert!(!cpu.thumb_ready());

        cpu.thumb_mode = true;
        assert!(cpu.thumb_ready());

        cpu.system_status = 0x1;
        assert!(!cpu.thumb_ready());
    }
}
