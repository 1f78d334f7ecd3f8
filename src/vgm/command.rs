//! VGM command decoding
//!
//! Only the opcodes an SN76489-only log needs are understood:
//!
//! | Opcode      | Operands        | Meaning                        |
//! |-------------|-----------------|--------------------------------|
//! | `0x50`      | `dd`            | write `dd` to the PSG port     |
//! | `0x61`      | `nn nn`         | wait `nnnn` samples (LE)       |
//! | `0x62`      |                 | wait 735 samples (1/60 s)      |
//! | `0x63`      |                 | wait 882 samples (1/50 s)      |
//! | `0x66`      |                 | end of sound data              |
//! | `0x70-0x79` |                 | wait `(op & 0xF) + 1` samples  |
//!
//! Every other opcode is rejected.

use crate::{Result, Sn76489Error};
use std::fmt;

/// PSG (SN76489) register write
pub const OP_PSG_WRITE: u8 = 0x50;
/// Wait n samples
pub const OP_WAIT: u8 = 0x61;
/// Wait one NTSC frame
pub const OP_WAIT_NTSC_FRAME: u8 = 0x62;
/// Wait one PAL frame
pub const OP_WAIT_PAL_FRAME: u8 = 0x63;
/// End of sound data
pub const OP_END: u8 = 0x66;
/// First short-wait opcode
pub const OP_SHORT_WAIT_FIRST: u8 = 0x70;
/// Last short-wait opcode handled
pub const OP_SHORT_WAIT_LAST: u8 = 0x79;

/// Samples in one 60 Hz frame at 44.1 kHz
pub const NTSC_FRAME_SAMPLES: u16 = 735;
/// Samples in one 50 Hz frame at 44.1 kHz
pub const PAL_FRAME_SAMPLES: u16 = 882;

/// A decoded VGM command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write a byte to the PSG port
    PsgWrite(u8),
    /// Render this many output samples
    Wait(u16),
    /// Stop interpretation
    End,
}

impl Command {
    /// Decode the command at `offset`
    ///
    /// Returns the command and its encoded length in bytes.
    ///
    /// # Errors
    /// - [`Sn76489Error::UnknownCommand`] for any unsupported opcode
    /// - [`Sn76489Error::TruncatedCommand`] if the operands run past `data`
    pub fn decode(data: &[u8], offset: usize) -> Result<(Command, usize)> {
        let Some(&opcode) = data.get(offset) else {
            return Err(Sn76489Error::InvalidVgm(format!(
                "command offset 0x{:X} is past the end of the data",
                offset
            )));
        };
        let operands = move |len: usize| {
            data.get(offset + 1..offset + 1 + len)
                .ok_or(Sn76489Error::TruncatedCommand { opcode, offset })
        };

        match opcode {
            OP_PSG_WRITE => {
                let value = operands(1)?[0];
                Ok((Command::PsgWrite(value), 2))
            }
            OP_WAIT => {
                let bytes = operands(2)?;
                Ok((Command::Wait(u16::from_le_bytes([bytes[0], bytes[1]])), 3))
            }
            OP_WAIT_NTSC_FRAME => Ok((Command::Wait(NTSC_FRAME_SAMPLES), 1)),
            OP_WAIT_PAL_FRAME => Ok((Command::Wait(PAL_FRAME_SAMPLES), 1)),
            OP_END => Ok((Command::End, 1)),
            OP_SHORT_WAIT_FIRST..=OP_SHORT_WAIT_LAST => {
                Ok((Command::Wait(u16::from(opcode & 0x0F) + 1), 1))
            }
            _ => Err(Sn76489Error::UnknownCommand { opcode, offset }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PsgWrite(value) => write!(f, "PSG write 0x{:02X}", value),
            Command::Wait(samples) => write!(f, "wait {} samples", samples),
            Command::End => write!(f, "end of sound data"),
        }
    }
}
