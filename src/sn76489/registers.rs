//! SN76489 Register Write Protocol
//!
//! The chip has a single write-only port. A byte with bit 7 set is a
//! latch/data byte:
//!
//! ```text
//!   7   6 5   4   3 2 1 0
//! | 1 | ch  | t | data    |   t: 1 = volume, 0 = period / noise control
//! ```
//!
//! A byte with bit 7 clear is a data byte whose low 6 bits go to whatever
//! channel and register were last latched.

use super::channel::RegisterKind;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Control bits of a register write byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LatchFlags: u8 {
        /// Latch/data byte (selects channel and register)
        const LATCH = 0x80;
        /// Volume register selected (period / noise control when clear)
        const VOLUME = 0x10;
    }
}

/// Decoded write to the PSG port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    /// Latch a channel/register and write its low 4 bits
    Latch {
        /// Target channel (0-2 tone, 3 noise)
        channel: usize,
        /// Target register
        kind: RegisterKind,
        /// 4 data bits
        data: u8,
    },
    /// Write 6 data bits to the latched channel/register
    Data {
        /// 6 data bits
        data: u8,
    },
}

impl RegisterWrite {
    /// Decode a raw port byte
    pub fn decode(value: u8) -> Self {
        let flags = LatchFlags::from_bits_truncate(value);
        if flags.contains(LatchFlags::LATCH) {
            let kind = if flags.contains(LatchFlags::VOLUME) {
                RegisterKind::Volume
            } else {
                RegisterKind::Period
            };
            RegisterWrite::Latch {
                channel: ((value >> 5) & 0x03) as usize,
                kind,
                data: value & 0x0F,
            }
        } else {
            RegisterWrite::Data { data: value & 0x3F }
        }
    }
}

impl fmt::Display for RegisterWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterWrite::Latch {
                channel,
                kind: RegisterKind::Volume,
                data,
            } => write!(f, "latch ch{} volume = 0x{:X}", channel, data),
            RegisterWrite::Latch {
                channel: 3,
                kind: RegisterKind::Period,
                data,
            } => write!(f, "latch noise control = 0x{:X}", data),
            RegisterWrite::Latch { channel, data, .. } => {
                write!(f, "latch ch{} period low = 0x{:X}", channel, data)
            }
            RegisterWrite::Data { data } => write!(f, "data = 0x{:02X}", data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latch_period() {
        assert_eq!(
            RegisterWrite::decode(0xC5),
            RegisterWrite::Latch {
                channel: 2,
                kind: RegisterKind::Period,
                data: 0x5
            }
        );
    }

    #[test]
    fn test_decode_latch_volume() {
        assert_eq!(
            RegisterWrite::decode(0xFF),
            RegisterWrite::Latch {
                channel: 3,
                kind: RegisterKind::Volume,
                data: 0xF
            }
        );
    }

    #[test]
    fn test_decode_data_keeps_six_bits() {
        assert_eq!(
            RegisterWrite::decode(0x7F),
            RegisterWrite::Data { data: 0x3F }
        );
        assert_eq!(
            RegisterWrite::decode(0x2A),
            RegisterWrite::Data { data: 0x2A }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RegisterWrite::decode(0x90).to_string(), "latch ch0 volume = 0x0");
        assert_eq!(RegisterWrite::decode(0xE4).to_string(), "latch noise control = 0x4");
        assert_eq!(RegisterWrite::decode(0x12).to_string(), "data = 0x12");
    }
}
