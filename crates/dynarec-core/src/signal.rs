use thiserror::Error;

/// Recoverable early-exit signals a compiled block can raise.
///
/// Neither signal is fatal. The cache manager resumes through the
/// interpreter in both cases, discarding the block's validity for this entry
/// point only on [`AbortSignal::Bailout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AbortSignal {
    /// Compile-time assumptions no longer hold: wrong execution mode, raised
    /// status flags, or a cached opcode that went stale.
    #[error("compiled block assumptions are no longer valid")]
    Bailout,
    /// An asynchronous event (interrupt or status flag) must be honored this
    /// cycle; the pipeline state committed so far remains valid.
    #[error("asynchronous event pending before pipeline tick")]
    TickBad,
}

/// Exit status a compiled block returns to the cache manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BlockExit {
    /// Every recorded instruction retired; the program counter sits past the
    /// final instruction, exactly as interpreted execution would leave it.
    Completed,
    /// The handler at `position` changed control flow; later trace entries
    /// were not dispatched.
    Flushed {
        /// Zero-based trace position whose handler flushed the pipeline.
        position: usize,
    },
    /// A guard failed and the block returned early.
    Aborted(AbortSignal),
}

impl BlockExit {
    /// Returns the abort signal when a guard cut the block short.
    #[must_use]
    pub const fn abort_signal(self) -> Option<AbortSignal> {
        match self {
            Self::Aborted(signal) => Some(signal),
            Self::Completed | Self::Flushed { .. } => None,
        }
    }

    /// True when the block exited through its normal path, either by
    /// completing or by retiring a control-flow change.
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Completed | Self::Flushed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{AbortSignal, BlockExit};

    #[test]
    fn abort_signal_accessor_reports_only_aborted_exits() {
        assert_eq!(BlockExit::Completed.abort_signal(), None);
        assert_eq!(BlockExit::Flushed { position: 3 }.abort_signal(), None);
        assert_eq!(
            BlockExit::Aborted(AbortSignal::Bailout).abort_signal(),
            Some(AbortSignal::Bailout)
        );
        assert_eq!(
            BlockExit::Aborted(AbortSignal::TickBad).abort_signal(),
            Some(AbortSignal::TickBad)
        );
    }

    #[test]
    fn flushed_exits_count_as_normal_returns() {
        assert!(BlockExit::Completed.is_normal());
        assert!(BlockExit::Flushed { position: 0 }.is_normal());
        assert!(!BlockExit::Aborted(AbortSignal::Bailout).is_normal());
        assert!(!BlockExit::Aborted(AbortSignal::TickBad).is_normal());
    }
}
