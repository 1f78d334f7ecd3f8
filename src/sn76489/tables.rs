//! SN76489 Hardware Constants
//!
//! Lookup tables and timing constants shared across the PSG components.

/// Attenuation to linear amplitude table
///
/// Index is the 4-bit attenuation value: 0 is the loudest level, each step
/// down is 2 dB quieter, and 15 is silence. The values are linear magnitudes
/// chosen so that four channels at full volume (4 × 0x1FFF = 32764) still fit
/// a signed 16-bit sample.
pub const VOLUME_TABLE: [i16; 16] = [
    0x1FFF, 0x196A, 0x1430, 0x1009, 0x0CBC, 0x0A1E, 0x0809, 0x0662, 0x0512, 0x0407, 0x0333,
    0x028A, 0x0204, 0x019A, 0x0146, 0x0000,
];

/// Attenuation value that silences a channel
pub const ATTENUATION_OFF: u8 = 0x0F;

/// Master clock prescaler: channels are clocked once every 16 chip cycles
pub const CLOCK_DIVIDER: u32 = 16;

/// Fixed noise shift periods for rate selections 0, 1 and 2
///
/// Rate selection 3 borrows the period of tone channel 2 instead.
pub const NOISE_PERIODS: [u16; 3] = [0x10, 0x20, 0x40];

/// Noise rate selection that borrows the tone 2 period
pub const NOISE_RATE_TONE2: u8 = 3;

/// Index of the tone channel whose period the noise channel may borrow
pub const NOISE_TONE_SOURCE: usize = 2;

/// Power-on seed of the noise shift register
pub const LFSR_SEED: u16 = 0x8000;

/// Number of tone channels
pub const NUM_TONE_CHANNELS: usize = 3;

/// Total number of channels (tones + noise)
pub const NUM_CHANNELS: usize = 4;

/// Mask for the 10-bit tone period register
pub const PERIOD_MASK: u16 = 0x3FF;

/// Linear amplitude for an attenuation value (0-15)
///
/// Masks the input to the valid range before the lookup.
#[inline]
pub fn get_volume(attenuation: u8) -> i16 {
    VOLUME_TABLE[(attenuation & 0x0F) as usize]
}
