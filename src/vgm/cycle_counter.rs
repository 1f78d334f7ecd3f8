//! Chip-Cycle Accounting
//!
//! Tracks how many master-clock cycles the renderer has actually fed the chip,
//! so the drift caused by the integer cycles-per-sample ratio can be reported.

/// Cycle Counter for emulated chip time
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleCounter {
    /// Current cycle count
    cycles: u64,
}

impl CycleCounter {
    /// Create a new cycle counter
    pub fn new() -> Self {
        CycleCounter { cycles: 0 }
    }

    /// Increment by n cycles
    pub fn advance(&mut self, n: u64) {
        self.cycles += n;
    }

    /// Get current cycle count
    pub fn get_cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycles a chip at `clock` Hz runs in `samples` output samples at `sample_rate`
    pub fn ideal_cycles(clock: u32, samples: usize, sample_rate: u32) -> u64 {
        u64::from(clock) * samples as u64 / u64::from(sample_rate)
    }

    /// Cycles the counter lags behind real chip time (positive = emulation is slow)
    pub fn drift(&self, clock: u32, samples: usize, sample_rate: u32) -> i64 {
        Self::ideal_cycles(clock, samples, sample_rate) as i64 - self.cycles as i64
    }
}
