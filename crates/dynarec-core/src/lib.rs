//! THUMB block-compilation ("dynarec") core for a Game Boy Advance style
//! emulator.
//!
//! The crate turns a recorded instruction trace into a guarded execution
//! routine that re-enacts the processor's fetch/decode/execute pipeline
//! cycle-accurately, validates its compile-time assumptions before every
//! step, and hands control back to the cache manager through two recoverable
//! signals when those assumptions break.

/// Deterministic opcode classification over the 10-bit primary-opcode space.
pub mod classify;
pub use classify::{ClassTable, OpcodeClass, CLASS_TABLE_SIZE, THUMB_CLASS_TABLE};

/// Processor and pipeline state model primitives.
pub mod state;
pub use state::{
    CpuState, PipelineState, INSTRUCTION_WIDTH, PC_INDEX, PIPELINE_FLUSH, REGISTER_COUNT,
};

/// Collaborator contracts consumed during block execution.
pub mod api;
pub use api::{BlockTraceEvent, NullSink, OpcodeBus, ThumbHandlers, TraceSink};

/// Early-exit signal taxonomy for compiled blocks.
pub mod signal;
pub use signal::{AbortSignal, BlockExit};

/// Trace compilation and the guarded block driver loop.
pub mod compile;
pub use compile::{BlockCompiler, BlockStep, CompiledBlock, PIPELINE_PRIME_TICKS};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
