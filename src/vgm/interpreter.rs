//! VGM command-stream interpreter
//!
//! Walks the command stream once, forwarding PSG writes to the backend and
//! turning waits into per-sample chip advancement. Each output sample is one
//! `advance(cycles_per_sample)` followed by one read of the mixed output.
//!
//! `cycles_per_sample` is `clock / 44100` with the remainder dropped, so long
//! logs run slightly slow in chip time. The drift is reported in the render
//! summary rather than corrected, keeping the output bit-compatible.

use super::command::Command;
use super::cycle_counter::CycleCounter;
use super::header::VgmHeader;
use super::VGM_SAMPLE_RATE;
use crate::backend::Sn76489Backend;
use crate::{Result, Sn76489Error};

/// Upper bound on the buffer reserved up front from the header's sample count
///
/// The declared count is untrusted; logs that end early at their end marker
/// only grow the buffer as far as they actually render.
const MAX_PREALLOCATED_SAMPLES: usize = VGM_SAMPLE_RATE as usize * 60 * 10;

/// Result of a completed render
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// PCM magnitudes, one per output sample, in generation order
    pub samples: Vec<i16>,
    /// Chip cycles advanced per output sample
    pub cycles_per_sample: u32,
    /// Total chip cycles emulated
    pub chip_cycles: u64,
    /// Commands decoded and executed (including the end marker)
    pub commands_executed: usize,
    /// Stream hit an end marker before the declared sample count
    pub ended_by_marker: bool,
}

impl RenderOutput {
    /// Playing time of the rendered buffer at 44.1 kHz
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / VGM_SAMPLE_RATE as f32
    }
}

/// Sample-accurate VGM interpreter over any chip backend
pub struct VgmInterpreter<'a, B: Sn76489Backend> {
    data: &'a [u8],
    cursor: usize,
    backend: B,
    clock: u32,
    cycles_per_sample: u32,
    target_samples: usize,
    samples: Vec<i16>,
    commands_executed: usize,
    cycles: CycleCounter,
}

impl<'a, B: Sn76489Backend> VgmInterpreter<'a, B> {
    /// Prepare to interpret `data` (a full VGM image) as described by `header`
    pub fn new(data: &'a [u8], header: &VgmHeader, backend: B) -> Self {
        let cycles_per_sample = super::cycles_per_sample(header.sn76489_clock);
        if cycles_per_sample == 0 {
            log::warn!(
                "PSG clock {} Hz is below the output rate; the chip will not advance",
                header.sn76489_clock
            );
        }
        let target_samples = header.total_samples as usize;

        Self {
            data,
            cursor: header.data_offset,
            backend,
            clock: header.sn76489_clock,
            cycles_per_sample,
            target_samples,
            samples: Vec::with_capacity(target_samples.min(MAX_PREALLOCATED_SAMPLES)),
            commands_executed: 0,
            cycles: CycleCounter::new(),
        }
    }

    /// Run the stream to the declared sample count or the end marker
    ///
    /// # Errors
    /// Any decode error halts interpretation immediately. The samples rendered
    /// up to that point stay in the interpreter (see [`rendered`](Self::rendered))
    /// and are not returned.
    pub fn run(&mut self) -> Result<RenderOutput> {
        let mut ended_by_marker = false;

        while self.samples.len() < self.target_samples {
            if self.cursor >= self.data.len() {
                return Err(Sn76489Error::UnexpectedEndOfData {
                    offset: self.cursor,
                    rendered: self.samples.len(),
                    expected: self.target_samples,
                });
            }

            let (command, length) = Command::decode(self.data, self.cursor)?;
            self.cursor += length;
            self.commands_executed += 1;

            match command {
                Command::PsgWrite(value) => self.backend.write_register(value),
                Command::Wait(samples) => self.render(usize::from(samples)),
                Command::End => {
                    ended_by_marker = true;
                    break;
                }
            }
        }

        let rendered = self.samples.len();
        if ended_by_marker && rendered < self.target_samples {
            log::info!(
                "End marker at offset 0x{:X} after {} of {} declared samples",
                self.cursor - 1,
                rendered,
                self.target_samples
            );
        }
        log::debug!(
            "Chip time drift: {} cycles behind over {} samples",
            self.cycles.drift(self.clock, rendered, VGM_SAMPLE_RATE),
            rendered
        );

        Ok(RenderOutput {
            samples: std::mem::take(&mut self.samples),
            cycles_per_sample: self.cycles_per_sample,
            chip_cycles: self.cycles.get_cycles(),
            commands_executed: self.commands_executed,
            ended_by_marker,
        })
    }

    /// Render up to `count` samples, never past the declared total
    fn render(&mut self, count: usize) {
        let remaining = self.target_samples - self.samples.len();
        let count = if count > remaining {
            log::warn!(
                "Wait of {} samples at offset 0x{:X} overruns the declared length; clamping to {}",
                count,
                self.cursor,
                remaining
            );
            remaining
        } else {
            count
        };

        let start = self.samples.len();
        self.samples.resize(start + count, 0);
        self.backend
            .render_into(self.cycles_per_sample, &mut self.samples[start..]);
        self.cycles
            .advance(count as u64 * u64::from(self.cycles_per_sample));
    }

    /// Samples rendered so far
    pub fn rendered(&self) -> usize {
        self.samples.len()
    }

    /// Current position in the VGM image
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Chip cycles advanced per output sample
    pub fn cycles_per_sample(&self) -> u32 {
        self.cycles_per_sample
    }

    /// Borrow the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the interpreter and return the backend
    pub fn into_backend(self) -> B {
        self.backend
    }
}
