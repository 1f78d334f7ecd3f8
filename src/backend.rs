//! Backend trait abstraction for SN76489 chip implementations
//!
//! This module defines the interface the VGM interpreter drives. The
//! cycle-exact [`Sn76489`](crate::Sn76489) is the only shipped
//! implementation; tests substitute recording backends to observe exactly
//! what the interpreter sends.

/// Common interface for SN76489 chip backends
///
/// # Example
///
/// ```
/// use sn76489::{Sn76489, Sn76489Backend};
///
/// fn play_note<B: Sn76489Backend>(chip: &mut B) -> i16 {
///     chip.write_register(0x8E); // Tone 0 period low nibble
///     chip.write_register(0x0F); // Tone 0 period high bits
///     chip.write_register(0x90); // Tone 0 volume: loudest
///     chip.render_sample(81)
/// }
///
/// let mut chip = Sn76489::new();
/// play_note(&mut chip);
/// ```
pub trait Sn76489Backend {
    /// Reset the backend to power-on state
    fn reset(&mut self);

    /// Write one byte to the PSG port (latch/data protocol)
    fn write_register(&mut self, value: u8);

    /// Step the chip by a number of master-clock cycles
    fn advance(&mut self, cycles: u32);

    /// Current mixed output as an unnormalized PCM magnitude
    fn sample(&self) -> i16;

    /// Step the chip by one output sample's worth of cycles and read the mix
    fn render_sample(&mut self, cycles: u32) -> i16 {
        self.advance(cycles);
        self.sample()
    }

    /// Render `buffer.len()` consecutive samples into a caller-provided buffer
    fn render_into(&mut self, cycles_per_sample: u32, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.render_sample(cycles_per_sample);
        }
    }
}
