//! Square-wave tone generator
//!
//! Each tone channel has a 10-bit down-counter. When the counter reaches zero
//! the output flips and the counter reloads from the period register. A period
//! write only lands in the register: the running counter picks it up at its
//! next zero-crossing, as on hardware.

use super::channel::{Channel, DataWidth, RegisterKind};
use super::tables::{ATTENUATION_OFF, PERIOD_MASK};

/// Tone generator for a single channel
#[derive(Clone, Debug)]
pub struct ToneChannel {
    /// 4-bit attenuation (0 = loudest, 15 = off)
    volume: u8,
    /// 10-bit period register
    period_reload: u16,
    /// Running counter, reloaded at each zero-crossing
    counter: i32,
    /// Output flip-flop
    phase: bool,
}

impl ToneChannel {
    /// Create a silent tone channel in power-on state
    pub fn new() -> Self {
        Self {
            volume: ATTENUATION_OFF,
            period_reload: 0,
            counter: 0,
            phase: false,
        }
    }

    /// Advance the channel by one prescaled clock
    ///
    /// A period of 0 or 1 flips the output on every clock.
    #[inline]
    pub fn clock(&mut self) {
        self.counter -= 1;
        if self.counter <= 0 {
            self.phase = !self.phase;
            self.counter = i32::from(self.period_reload);
        }
    }

    /// Current 10-bit period register
    #[inline]
    pub fn period_reload(&self) -> u16 {
        self.period_reload
    }

    /// Current counter value
    #[inline]
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Current output flip-flop state
    #[inline]
    pub fn phase(&self) -> bool {
        self.phase
    }

    /// Reset to power-on state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ToneChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for ToneChannel {
    #[inline]
    fn output_level(&self) -> u8 {
        if self.phase {
            self.volume
        } else {
            ATTENUATION_OFF
        }
    }

    fn write_data(&mut self, kind: RegisterKind, width: DataWidth, data: u8) {
        match (kind, width) {
            (RegisterKind::Volume, _) => self.volume = data & 0x0F,
            (RegisterKind::Period, DataWidth::Narrow) => {
                self.period_reload = (self.period_reload & 0x3F0) | u16::from(data & 0x0F);
            }
            (RegisterKind::Period, DataWidth::Wide) => {
                self.period_reload =
                    ((self.period_reload & 0x00F) | (u16::from(data & 0x3F) << 4)) & PERIOD_MASK;
            }
        }
    }

    fn volume(&self) -> u8 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Count phase flips over `ticks` clocks
    fn count_toggles(tone: &mut ToneChannel, ticks: u32) -> u32 {
        let mut toggles = 0;
        let mut last = tone.phase();
        for _ in 0..ticks {
            tone.clock();
            if tone.phase() != last {
                toggles += 1;
                last = tone.phase();
            }
        }
        toggles
    }

    fn set_period(tone: &mut ToneChannel, period: u16) {
        tone.write_data(RegisterKind::Period, DataWidth::Narrow, (period & 0x0F) as u8);
        tone.write_data(RegisterKind::Period, DataWidth::Wide, (period >> 4) as u8);
    }

    #[test]
    fn test_power_on_state() {
        let tone = ToneChannel::new();
        assert_eq!(tone.volume(), ATTENUATION_OFF);
        assert_eq!(tone.period_reload(), 0);
        assert!(!tone.phase());
        assert_eq!(tone.output_level(), ATTENUATION_OFF);
    }

    #[test]
    fn test_toggle_cadence_for_every_period() {
        const BUDGET: u32 = 4096;
        for period in 0u16..=1023 {
            let mut tone = ToneChannel::new();
            set_period(&mut tone, period);
            // The power-on counter is 0, so the first clock always flips.
            let step = u32::from(period.max(1));
            let expected = 1 + (BUDGET - 1) / step;
            assert_eq!(
                count_toggles(&mut tone, BUDGET),
                expected,
                "period {} should flip every {} clocks",
                period,
                step
            );
        }
    }

    #[test]
    fn test_full_wave_is_twice_the_period() {
        let mut tone = ToneChannel::new();
        set_period(&mut tone, 5);
        tone.clock(); // first zero-crossing loads the period
        let start = tone.phase();
        let mut ticks = 0;
        let mut flips = 0;
        while flips < 2 {
            tone.clock();
            ticks += 1;
            if tone.phase() != start && flips == 0 {
                flips = 1;
            } else if tone.phase() == start && flips == 1 {
                flips = 2;
            }
        }
        assert_eq!(ticks, 10);
    }

    #[test]
    fn test_split_period_write_narrow_then_wide() {
        let mut tone = ToneChannel::new();
        tone.write_data(RegisterKind::Period, DataWidth::Narrow, 0x3);
        tone.write_data(RegisterKind::Period, DataWidth::Wide, 0x2A);
        assert_eq!(tone.period_reload(), 0x2A3);
    }

    #[test]
    fn test_split_period_write_wide_then_narrow() {
        let mut tone = ToneChannel::new();
        tone.write_data(RegisterKind::Period, DataWidth::Wide, 0x2A);
        tone.write_data(RegisterKind::Period, DataWidth::Narrow, 0x3);
        assert_eq!(tone.period_reload(), 0x2A3);
    }

    #[test]
    fn test_partial_writes_preserve_other_bits() {
        let mut tone = ToneChannel::new();
        set_period(&mut tone, 0x3FF);
        tone.write_data(RegisterKind::Period, DataWidth::Narrow, 0x0);
        assert_eq!(tone.period_reload(), 0x3F0);
        tone.write_data(RegisterKind::Period, DataWidth::Wide, 0x00);
        assert_eq!(tone.period_reload(), 0x000);
    }

    #[test]
    fn test_volume_write_ignores_width() {
        let mut tone = ToneChannel::new();
        tone.write_data(RegisterKind::Volume, DataWidth::Wide, 0x35);
        assert_eq!(tone.volume(), 0x5);
        tone.write_data(RegisterKind::Volume, DataWidth::Narrow, 0x2);
        assert_eq!(tone.volume(), 0x2);
    }

    #[test]
    fn test_period_change_waits_for_zero_crossing() {
        let mut tone = ToneChannel::new();
        set_period(&mut tone, 100);
        tone.clock(); // counter = 100
        for _ in 0..10 {
            tone.clock();
        }
        assert_eq!(tone.counter(), 90);

        set_period(&mut tone, 3);
        assert_eq!(tone.counter(), 90, "write must not touch the running counter");

        let phase = tone.phase();
        for _ in 0..89 {
            tone.clock();
        }
        assert_eq!(tone.phase(), phase);
        tone.clock();
        assert_ne!(tone.phase(), phase);
        assert_eq!(tone.counter(), 3);
    }

    #[test]
    fn test_output_level_follows_phase() {
        let mut tone = ToneChannel::new();
        tone.write_data(RegisterKind::Volume, DataWidth::Narrow, 0x4);
        assert_eq!(tone.output_level(), ATTENUATION_OFF);
        tone.clock();
        assert!(tone.phase());
        assert_eq!(tone.output_level(), 0x4);
    }
}
