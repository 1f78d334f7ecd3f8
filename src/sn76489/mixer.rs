//! SN76489 Output Mixer
//!
//! Converts each channel's attenuation index to a linear amplitude via the
//! volume table and sums the four channels.
//!
//! Features:
//! - Raw channel summing without normalization or clipping
//! - Per-channel mute for isolating voices when rendering

use super::tables::{get_volume, NUM_CHANNELS};

/// Audio Mixer - Combines all channels
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    muted: [bool; NUM_CHANNELS],
}

impl Mixer {
    /// Create a new mixer with every channel audible
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum the linear amplitudes for the given attenuation levels
    ///
    /// The result is at most 4 × 0x1FFF and is returned verbatim; no clipping
    /// or normalization takes place.
    #[inline]
    pub fn mix(&self, levels: [u8; NUM_CHANNELS]) -> i16 {
        let mut output = 0;
        for (channel, &level) in levels.iter().enumerate() {
            if !self.muted[channel] {
                output += get_volume(level);
            }
        }
        output
    }

    /// Mute or unmute a channel (0-2 tone, 3 noise)
    pub fn set_channel_mute(&mut self, channel: usize, mute: bool) {
        if let Some(slot) = self.muted.get_mut(channel) {
            *slot = mute;
        }
    }

    /// Check if a channel is muted
    pub fn is_channel_muted(&self, channel: usize) -> bool {
        self.muted.get(channel).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sn76489::tables::VOLUME_TABLE;

    #[test]
    fn test_silent_channels() {
        let mixer = Mixer::new();
        assert_eq!(mixer.mix([0xF; NUM_CHANNELS]), 0);
    }

    #[test]
    fn test_all_loud_is_unclipped_sum() {
        let mixer = Mixer::new();
        assert_eq!(mixer.mix([0; NUM_CHANNELS]), 4 * 0x1FFF);
    }

    #[test]
    fn test_mixed_levels() {
        let mixer = Mixer::new();
        let expected = VOLUME_TABLE[0] + VOLUME_TABLE[4] + VOLUME_TABLE[8] + VOLUME_TABLE[15];
        assert_eq!(mixer.mix([0, 4, 8, 15]), expected);
    }

    #[test]
    fn test_muted_channel_is_dropped() {
        let mut mixer = Mixer::new();
        mixer.set_channel_mute(1, true);
        assert!(mixer.is_channel_muted(1));
        assert_eq!(mixer.mix([0, 0, 0xF, 0xF]), 0x1FFF);

        mixer.set_channel_mute(1, false);
        assert_eq!(mixer.mix([0, 0, 0xF, 0xF]), 2 * 0x1FFF);
    }

    #[test]
    fn test_out_of_range_mute_is_ignored() {
        let mut mixer = Mixer::new();
        mixer.set_channel_mute(7, true);
        assert!(!mixer.is_channel_muted(7));
        assert_eq!(mixer.mix([0; NUM_CHANNELS]), 4 * 0x1FFF);
    }
}
