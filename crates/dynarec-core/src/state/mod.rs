//! Processor and pipeline state shared between the block driver and
//! instruction handlers.

/// Architectural register file and mode/status flags.
pub mod registers;

/// Three-stage pipeline latches and validity tracking.
pub mod pipeline;

pub use pipeline::{PipelineState, PIPELINE_FLUSH};
pub use registers::{CpuState, INSTRUCTION_WIDTH, PC_INDEX, REGISTER_COUNT};
