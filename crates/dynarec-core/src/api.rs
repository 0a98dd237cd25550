//! Collaborator contracts consumed by compiled-block execution.
//!
//! These traits are the seam to the rest of the emulator: the live memory
//! image, the per-class instruction handlers, and the optional trace hooks.
//! The core emits guarded dispatch around them and never supplies instruction
//! semantics of its own.

use crate::classify::OpcodeClass;
use crate::signal::AbortSignal;
use crate::state::CpuState;

/// Live memory image the pipeline fetches opcode words from.
///
/// Takes `&mut self` because real buses tick wait-state accounting on every
/// fetch.
pub trait OpcodeBus {
    /// Reads the 16-bit opcode word at `addr`.
    fn fetch16(&mut self, addr: u32) -> u16;
}

/// Per-class instruction handlers supplying the actual instruction semantics.
pub trait ThumbHandlers {
    /// Executes the semantics for `class`.
    ///
    /// The opcode word being executed sits in `cpu.pipeline.execute`.
    /// Handlers mutate register and pipeline state; a control-flow change
    /// must load the pipeline validity mask (see
    /// [`PipelineState::flush`](crate::PipelineState::flush)).
    fn execute(&mut self, class: OpcodeClass, cpu: &mut CpuState);
}

/// Typed events emitted at block-execution boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTraceEvent {
    /// A priming tick filled one pipeline stage.
    Primed {
        /// Program-counter value the word was fetched from.
        pc: u32,
        /// The fetched opcode word.
        opcode: u16,
    },
    /// A recorded instruction was dispatched to its handler.
    Dispatched {
        /// Zero-based trace position of the dispatched instruction.
        position: usize,
        /// Handler class resolved at compile time.
        class: OpcodeClass,
        /// The recorded opcode word.
        opcode: u16,
    },
    /// A handler changed control flow, truncating the block.
    Flushed {
        /// Zero-based trace position whose handler flushed the pipeline.
        position: usize,
    },
    /// A guard failed and the block returned early.
    Aborted {
        /// The raised early-exit signal.
        signal: AbortSignal,
        /// Program-counter value at the failed guard.
        pc: u32,
    },
}

/// Sink trait for deterministic block-execution hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: BlockTraceEvent);
}

/// No-op sink used by the untraced execution path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn on_event(&mut self, _event: BlockTraceEvent) {}
}
