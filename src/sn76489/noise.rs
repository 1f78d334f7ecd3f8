//! Noise generator
//!
//! A 16-bit shift register clocked by its own down-counter. Every second
//! zero-crossing samples bit 0 as the output phase and shifts the register
//! right, feeding back either bit 0 alone (periodic noise) or bit 0 XOR bit 3
//! (white noise) into bit 15.
//!
//! The counter reloads from one of three fixed periods, or, with rate
//! selection 3, from the live period register of tone channel 2. That period
//! is re-read at every reload, so retuning tone 2 retunes the noise too.

use super::channel::{Channel, DataWidth, RegisterKind};
use super::tables::{ATTENUATION_OFF, LFSR_SEED, NOISE_PERIODS, NOISE_RATE_TONE2};
use super::tone::ToneChannel;

/// Noise generator using a 16-bit LFSR
#[derive(Clone, Debug)]
pub struct NoiseChannel {
    /// 4-bit attenuation (0 = loudest, 15 = off)
    volume: u8,
    /// Rate selection (0-2 fixed period, 3 = tone 2 period)
    rate: u8,
    /// White (tapped) or periodic feedback
    white_noise: bool,
    /// Running counter, reloaded at each zero-crossing
    counter: i32,
    /// Divides zero-crossings by two before the register shifts
    shift_toggle: bool,
    /// Output phase sampled from LFSR bit 0
    phase: bool,
    /// 16-bit shift register
    lfsr: u16,
}

impl NoiseChannel {
    /// Create a silent noise channel in power-on state
    pub fn new() -> Self {
        Self {
            volume: ATTENUATION_OFF,
            rate: 0,
            white_noise: false,
            counter: i32::from(NOISE_PERIODS[0]),
            shift_toggle: false,
            phase: false,
            lfsr: LFSR_SEED,
        }
    }

    /// Advance the channel by one prescaled clock
    ///
    /// `tone2` is only read, and only when rate selection 3 is active.
    #[inline]
    pub fn clock(&mut self, tone2: &ToneChannel) {
        self.counter -= 1;
        if self.counter <= 0 {
            self.shift_toggle = !self.shift_toggle;
            if self.shift_toggle {
                self.phase = self.lfsr & 0x1 == 0x1;
                self.shift();
            }
            self.counter = i32::from(self.reload_period(tone2));
        }
    }

    #[inline]
    fn shift(&mut self) {
        let feedback = if self.white_noise {
            (self.lfsr ^ (self.lfsr >> 3)) & 0x1
        } else {
            self.lfsr & 0x1
        };
        self.lfsr = (self.lfsr >> 1) | (feedback << 15);
    }

    /// Period the counter reloads from at the next zero-crossing
    #[inline]
    pub fn reload_period(&self, tone2: &ToneChannel) -> u16 {
        if self.rate == NOISE_RATE_TONE2 {
            tone2.period_reload()
        } else {
            NOISE_PERIODS[self.rate as usize]
        }
    }

    /// Current shift register contents
    #[inline]
    pub fn lfsr(&self) -> u16 {
        self.lfsr
    }

    /// Current rate selection (0-3)
    #[inline]
    pub fn rate(&self) -> u8 {
        self.rate
    }

    /// Whether white-noise feedback is selected
    #[inline]
    pub fn is_white_noise(&self) -> bool {
        self.white_noise
    }

    /// Current counter value
    #[inline]
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Current output phase
    #[inline]
    pub fn phase(&self) -> bool {
        self.phase
    }

    /// Reset to power-on state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for NoiseChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for NoiseChannel {
    #[inline]
    fn output_level(&self) -> u8 {
        if self.phase {
            self.volume
        } else {
            ATTENUATION_OFF
        }
    }

    /// Period-type writes set the noise control bits (rate, feedback mode)
    ///
    /// The shift register is left alone: this core does not reseed on a
    /// control write.
    fn write_data(&mut self, kind: RegisterKind, _width: DataWidth, data: u8) {
        match kind {
            RegisterKind::Volume => self.volume = data & 0x0F,
            RegisterKind::Period => {
                self.rate = data & 0x03;
                self.white_noise = data & 0x04 == 0x04;
            }
        }
    }

    fn volume(&self) -> u8 {
        self.volume
    }
}
