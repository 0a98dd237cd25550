//! Trace compilation and the guarded block driver loop.
//!
//! A compiled block is an optimistic cache of a previously observed control
//! path. Every step re-validates its assumptions before committing state:
//! asynchronous events win over the staleness check, the staleness check wins
//! over dispatch, and a pipeline flush truncates the remaining steps. The
//! driver interprets the compiled guard/dispatch steps in a fixed loop; no
//! code is synthesized at run time.

use crate::api::{BlockTraceEvent, NullSink, OpcodeBus, ThumbHandlers, TraceSink};
use crate::classify::{ClassTable, OpcodeClass};
use crate::signal::{AbortSignal, BlockExit};
use crate::state::CpuState;

/// Pipeline ticks required before the first fetched instruction reaches the
/// execute stage.
pub const PIPELINE_PRIME_TICKS: usize = 2;

/// One guarded dispatch step of a compiled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BlockStep {
    /// Opcode word observed at this trace position during interpretation.
    pub recorded: u16,
    /// Handler class resolved for `recorded` at compile time.
    pub class: OpcodeClass,
}

/// Guarded execution routine compiled from one instruction trace.
///
/// The block holds no reference back into the compiler; its lifetime and
/// invalidation are the cache manager's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CompiledBlock {
    start_addr: u32,
    steps: Box<[BlockStep]>,
}

impl CompiledBlock {
    /// Program-counter value at which the first recorded instruction
    /// executes.
    #[must_use]
    pub const fn start_addr(&self) -> u32 {
        self.start_addr
    }

    /// Compiled guard/dispatch steps in trace order.
    #[must_use]
    pub fn steps(&self) -> &[BlockStep] {
        &self.steps
    }

    /// Number of recorded instructions in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the block contains only the entry guard and priming ticks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the block against live processor state.
    pub fn run<M>(&self, cpu: &mut CpuState, machine: &mut M) -> BlockExit
    where
        M: OpcodeBus + ThumbHandlers,
    {
        self.run_traced(cpu, machine, &mut NullSink)
    }

    /// Runs the block, reporting boundary events to `sink`.
    ///
    /// Behavior, in order: the entry guard checks execution mode and status
    /// flags; two priming ticks fill the decode and execute stages; then each
    /// recorded instruction runs its guard sequence and dispatches. Any guard
    /// failure returns before the step it protects commits state.
    pub fn run_traced<M, S>(&self, cpu: &mut CpuState, machine: &mut M, sink: &mut S) -> BlockExit
    where
        M: OpcodeBus + ThumbHandlers,
        S: TraceSink,
    {
        if !cpu.thumb_ready() {
            return abort(cpu, sink, AbortSignal::Bailout);
        }

        for _ in 0..PIPELINE_PRIME_TICKS {
            if cpu.event_pending() {
                return abort(cpu, sink, AbortSignal::TickBad);
            }
            cpu.pipeline.tick();
            let opcode = machine.fetch16(cpu.pc());
            sink.on_event(BlockTraceEvent::Primed {
                pc: cpu.pc(),
                opcode,
            });
            cpu.pipeline.fetch = opcode;
            cpu.pipeline.advance();
            cpu.advance_pc();
        }

        for (position, step) in self.steps.iter().enumerate() {
            if cpu.event_pending() {
                return abort(cpu, sink, AbortSignal::TickBad);
            }
            if cpu.pipeline.execute != step.recorded {
                return abort(cpu, sink, AbortSignal::Bailout);
            }
            cpu.pipeline.tick();
            cpu.pipeline.fetch = machine.fetch16(cpu.pc());
            sink.on_event(BlockTraceEvent::Dispatched {
                position,
                class: step.class,
                opcode: step.recorded,
            });
            machine.execute(step.class, cpu);
            cpu.pipeline.advance();
            if cpu.pipeline.is_valid() {
                cpu.advance_pc();
            } else {
                sink.on_event(BlockTraceEvent::Flushed { position });
                return BlockExit::Flushed { position };
            }
        }

        BlockExit::Completed
    }
}

fn abort<S: TraceSink>(cpu: &CpuState, sink: &mut S, signal: AbortSignal) -> BlockExit {
    sink.on_event(BlockTraceEvent::Aborted {
        signal,
        pc: cpu.pc(),
    });
    BlockExit::Aborted(signal)
}

/// Compiles recorded instruction traces into guarded execution routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCompiler {
    classes: ClassTable,
}

impl BlockCompiler {
    /// Creates a compiler over the full THUMB classification table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: ClassTable::new(),
        }
    }

    /// Read access to the classification table.
    #[must_use]
    pub const fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Compiles `trace`, recorded starting at `start_addr`, into a block.
    ///
    /// Every input produces a valid routine. An empty trace yields a routine
    /// containing only the entry guard and the two priming ticks. Each trace
    /// element is classified exactly once, here; execution never consults the
    /// table again.
    #[must_use]
    pub fn compile(&self, start_addr: u32, trace: &[u16]) -> CompiledBlock {
        let steps = trace
            .iter()
            .map(|&recorded| BlockStep {
                recorded,
                class: self.classes.classify(recorded),
            })
            .collect();
        CompiledBlock { start_addr, steps }
    }
}

impl Default for BlockCompiler {
    fn default() -> Self {
        Self::new()
    }
}
