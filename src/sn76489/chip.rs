//! SN76489 PSG emulation
//!
//! Owns the three tone channels and the noise channel, the write latch, and
//! the /16 prescaler that every channel shares. The host steps the chip in
//! master-clock cycles and reads one mixed sample whenever it needs one.

use super::channel::{Channel, DataWidth, RegisterKind};
use super::mixer::Mixer;
use super::noise::NoiseChannel;
use super::registers::RegisterWrite;
use super::tables::{CLOCK_DIVIDER, NOISE_TONE_SOURCE, NUM_CHANNELS, NUM_TONE_CHANNELS};
use super::tone::ToneChannel;
use crate::backend::Sn76489Backend;

/// Index of the noise channel in the latch encoding
const NOISE_CHANNEL: usize = 3;

/// SN76489 PSG emulator
#[derive(Clone)]
pub struct Sn76489 {
    tones: [ToneChannel; NUM_TONE_CHANNELS],
    noise: NoiseChannel,
    /// Cycles left until the next channel clock
    divider: u32,
    latched_channel: usize,
    latched_kind: RegisterKind,
    mixer: Mixer,
}

impl Sn76489 {
    /// Create a new SN76489 in power-on state
    pub fn new() -> Self {
        Self {
            tones: [ToneChannel::new(), ToneChannel::new(), ToneChannel::new()],
            noise: NoiseChannel::new(),
            divider: CLOCK_DIVIDER,
            latched_channel: 0,
            latched_kind: RegisterKind::Period,
            mixer: Mixer::new(),
        }
    }

    /// Reset the chip to power-on state
    ///
    /// Channel mutes are a host setting and survive the reset.
    pub fn reset(&mut self) {
        for tone in self.tones.iter_mut() {
            tone.reset();
        }
        self.noise.reset();
        self.divider = CLOCK_DIVIDER;
        self.latched_channel = 0;
        self.latched_kind = RegisterKind::Period;
    }

    /// Write a byte to the PSG port
    ///
    /// Latch/data bytes select a channel and register and carry the low 4
    /// bits; data bytes carry 6 bits for the latched target. Period writes
    /// only update the period register, never the running counter.
    pub fn write_register(&mut self, value: u8) {
        let write = RegisterWrite::decode(value);
        log::trace!("PSG write 0x{:02X}: {}", value, write);

        match write {
            RegisterWrite::Latch {
                channel,
                kind,
                data,
            } => {
                self.latched_channel = channel;
                self.latched_kind = kind;
                self.channel_mut(channel)
                    .write_data(kind, DataWidth::Narrow, data);
            }
            RegisterWrite::Data { data } => {
                let (channel, kind) = (self.latched_channel, self.latched_kind);
                self.channel_mut(channel).write_data(kind, DataWidth::Wide, data);
            }
        }
    }

    fn channel_mut(&mut self, channel: usize) -> &mut dyn Channel {
        match channel {
            NOISE_CHANNEL => &mut self.noise,
            tone => &mut self.tones[tone],
        }
    }

    /// Step the chip by `cycles` master-clock cycles
    ///
    /// Every 16th cycle clocks all four channels once.
    pub fn advance(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.divider -= 1;
            if self.divider == 0 {
                self.clock_channels();
                self.divider = CLOCK_DIVIDER;
            }
        }
    }

    #[inline]
    fn clock_channels(&mut self) {
        for tone in self.tones.iter_mut() {
            tone.clock();
        }
        self.noise.clock(&self.tones[NOISE_TONE_SOURCE]);
    }

    /// Mixed output for the current chip state
    ///
    /// Raw sum of the four channel amplitudes, never clipped or normalized.
    pub fn sample(&self) -> i16 {
        self.mixer.mix(self.output_levels())
    }

    /// Attenuation index currently output by each channel (tones, then noise)
    pub fn output_levels(&self) -> [u8; NUM_CHANNELS] {
        [
            self.tones[0].output_level(),
            self.tones[1].output_level(),
            self.tones[2].output_level(),
            self.noise.output_level(),
        ]
    }

    /// Currently latched channel and register
    pub fn latched(&self) -> (usize, RegisterKind) {
        (self.latched_channel, self.latched_kind)
    }

    /// Tone channel 0-2
    ///
    /// # Panics
    /// Panics if `index` is not a tone channel.
    pub fn tone(&self, index: usize) -> &ToneChannel {
        &self.tones[index]
    }

    /// The noise channel
    pub fn noise(&self) -> &NoiseChannel {
        &self.noise
    }

    /// Cycles left until the next channel clock
    pub fn divider(&self) -> u32 {
        self.divider
    }

    /// Mute or unmute a channel (0-2 tone, 3 noise)
    pub fn set_channel_mute(&mut self, channel: usize, mute: bool) {
        self.mixer.set_channel_mute(channel, mute);
    }

    /// Check if a channel is muted
    pub fn is_channel_muted(&self, channel: usize) -> bool {
        self.mixer.is_channel_muted(channel)
    }
}

impl Default for Sn76489 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sn76489Backend for Sn76489 {
    fn reset(&mut self) {
        Sn76489::reset(self)
    }

    fn write_register(&mut self, value: u8) {
        Sn76489::write_register(self, value)
    }

    fn advance(&mut self, cycles: u32) {
        Sn76489::advance(self, cycles)
    }

    fn sample(&self) -> i16 {
        Sn76489::sample(self)
    }
}

impl std::fmt::Debug for Sn76489 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let periods: Vec<u16> = self.tones.iter().map(|t| t.period_reload()).collect();
        let volumes: Vec<u8> = self.tones.iter().map(|t| t.volume()).collect();
        f.debug_struct("Sn76489")
            .field("tone_periods", &periods)
            .field("tone_volumes", &volumes)
            .field("noise_rate", &self.noise.rate())
            .field("noise_white", &self.noise.is_white_noise())
            .field("noise_volume", &self.noise.volume())
            .field("latched", &(self.latched_channel, self.latched_kind))
            .finish()
    }
}
