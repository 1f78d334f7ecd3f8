//! VGM file header
//!
//! Only the fields relevant to an SN76489-only log are decoded. All fields
//! are little-endian and most offsets are relative to their own position.
//!
//! ```text
//! 0x00 "Vgm "        0x04 EOF offset     0x08 version (BCD)   0x0C SN76489 clock
//! 0x14 GD3 offset    0x18 total samples  0x1C loop offset     0x20 loop samples
//! 0x24 rate          0x28 SN feedback    0x2A SN shift width  0x2B SN flags
//! 0x34 VGM data offset (v1.50+)
//! ```

use crate::{Result, Sn76489Error};
use nom::bytes::complete::{tag, take};
use nom::number::complete::{le_u16, le_u32, u8 as le_u8};
use nom::IResult;
use serde::Serialize;

/// File magic
pub const VGM_MAGIC: &[u8; 4] = b"Vgm ";

/// Smallest header this parser accepts (v1.50 layout)
pub const MIN_HEADER_SIZE: usize = 0x40;

/// Command stream offset used when the header does not declare one
pub const DEFAULT_DATA_OFFSET: usize = 0x40;

/// Position of the relative data offset field
const DATA_OFFSET_FIELD: usize = 0x34;

/// Clock bit 30: a second SN76489 is present
const CLOCK_DUAL_CHIP: u32 = 1 << 30;

/// Clock bit 31: T6W28 (NeoGeo Pocket) variant
const CLOCK_T6W28: u32 = 1 << 31;

/// LFSR feedback pattern this core implements (taps on bits 0 and 3)
pub const EMULATED_FEEDBACK: u16 = 0x0009;

/// LFSR width this core implements
pub const EMULATED_SHIFT_WIDTH: u8 = 16;

/// Parsed VGM header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VgmHeader {
    /// Format version in BCD (0x150 = 1.50)
    pub version: u32,
    /// Total file length as declared by the EOF offset
    pub file_length: usize,
    /// SN76489 clock in Hz, flag bits removed
    pub sn76489_clock: u32,
    /// Header declared a second chip (bit 30)
    pub dual_chip: bool,
    /// Header declared the T6W28 variant (bit 31)
    pub t6w28: bool,
    /// Absolute offset of the GD3 tag, if any
    pub gd3_offset: Option<usize>,
    /// Total number of 44.1 kHz samples in the log
    pub total_samples: u32,
    /// Absolute loop offset, if any
    pub loop_offset: Option<usize>,
    /// Samples in one loop
    pub loop_samples: u32,
    /// Recording rate in Hz (0 if unspecified)
    pub rate: u32,
    /// Declared LFSR feedback pattern (0 if unspecified)
    pub sn76489_feedback: u16,
    /// Declared LFSR width (0 if unspecified)
    pub sn76489_shift_width: u8,
    /// Declared SN76489 flags
    pub sn76489_flags: u8,
    /// Absolute offset where the command stream begins
    pub data_offset: usize,
}

/// Header fields exactly as stored
struct RawHeader {
    eof_offset: u32,
    version: u32,
    sn76489_clock: u32,
    gd3_offset: u32,
    total_samples: u32,
    loop_offset: u32,
    loop_samples: u32,
    rate: u32,
    sn76489_feedback: u16,
    sn76489_shift_width: u8,
    sn76489_flags: u8,
    data_offset: u32,
}

fn raw_header(input: &[u8]) -> IResult<&[u8], RawHeader> {
    let (input, _) = tag(&VGM_MAGIC[..])(input)?;
    let (input, eof_offset) = le_u32(input)?;
    let (input, version) = le_u32(input)?;
    let (input, sn76489_clock) = le_u32(input)?;
    let (input, _ym2413_clock) = le_u32(input)?;
    let (input, gd3_offset) = le_u32(input)?;
    let (input, total_samples) = le_u32(input)?;
    let (input, loop_offset) = le_u32(input)?;
    let (input, loop_samples) = le_u32(input)?;
    let (input, rate) = le_u32(input)?;
    let (input, sn76489_feedback) = le_u16(input)?;
    let (input, sn76489_shift_width) = le_u8(input)?;
    let (input, sn76489_flags) = le_u8(input)?;
    // YM2612 and YM2151 clocks
    let (input, _) = take(8usize)(input)?;
    let (input, data_offset) = le_u32(input)?;

    Ok((
        input,
        RawHeader {
            eof_offset,
            version,
            sn76489_clock,
            gd3_offset,
            total_samples,
            loop_offset,
            loop_samples,
            rate,
            sn76489_feedback,
            sn76489_shift_width,
            sn76489_flags,
            data_offset,
        },
    ))
}

/// Resolve a field-relative offset; zero means "absent"
fn relative(field_pos: usize, value: u32) -> Option<usize> {
    (value != 0).then(|| field_pos + value as usize)
}

impl VgmHeader {
    /// Parse and validate the header at the start of a VGM image
    ///
    /// # Errors
    /// - [`Sn76489Error::InvalidVgm`] for short data, bad magic or a data
    ///   offset outside the image
    /// - [`Sn76489Error::MissingPsgClock`] when no SN76489 clock is declared
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Self::read(data)?;
        if header.sn76489_clock == 0 {
            return Err(Sn76489Error::MissingPsgClock);
        }
        Ok(header)
    }

    /// Decode the header without requiring an SN76489 clock
    ///
    /// For inspecting logs that [`parse`](Self::parse) rejects because they
    /// target another chip. Structural checks still apply.
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_HEADER_SIZE {
            return Err(Sn76489Error::InvalidVgm(format!(
                "file too small for VGM header ({} bytes, need {})",
                data.len(),
                MIN_HEADER_SIZE
            )));
        }
        if !data.starts_with(VGM_MAGIC) {
            return Err(Sn76489Error::InvalidVgm("missing \"Vgm \" magic".into()));
        }

        let (_, raw) = raw_header(data)
            .map_err(|e| Sn76489Error::InvalidVgm(format!("malformed header: {:?}", e)))?;

        let dual_chip = raw.sn76489_clock & CLOCK_DUAL_CHIP != 0;
        let t6w28 = raw.sn76489_clock & CLOCK_T6W28 != 0;
        let sn76489_clock = raw.sn76489_clock & !(CLOCK_DUAL_CHIP | CLOCK_T6W28);
        if dual_chip || t6w28 {
            log::warn!(
                "VGM header requests {}; emulating a single SN76489",
                if t6w28 { "a T6W28" } else { "dual SN76489s" }
            );
        }

        let data_offset =
            relative(DATA_OFFSET_FIELD, raw.data_offset).unwrap_or(DEFAULT_DATA_OFFSET);
        if data_offset >= data.len() {
            return Err(Sn76489Error::InvalidVgm(format!(
                "data offset 0x{:X} is past the end of the file (0x{:X} bytes)",
                data_offset,
                data.len()
            )));
        }

        let header = VgmHeader {
            version: raw.version,
            file_length: raw.eof_offset as usize + 0x04,
            sn76489_clock,
            dual_chip,
            t6w28,
            gd3_offset: relative(0x14, raw.gd3_offset),
            total_samples: raw.total_samples,
            loop_offset: relative(0x1C, raw.loop_offset),
            loop_samples: raw.loop_samples,
            rate: raw.rate,
            sn76489_feedback: raw.sn76489_feedback,
            sn76489_shift_width: raw.sn76489_shift_width,
            sn76489_flags: raw.sn76489_flags,
            data_offset,
        };
        header.warn_on_chip_mismatch();

        log::debug!("{:?}", header);
        Ok(header)
    }

    fn warn_on_chip_mismatch(&self) {
        if self.sn76489_feedback != 0 && self.sn76489_feedback != EMULATED_FEEDBACK {
            log::warn!(
                "VGM header declares LFSR feedback 0x{:04X}; emulating 0x{:04X}",
                self.sn76489_feedback,
                EMULATED_FEEDBACK
            );
        }
        if self.sn76489_shift_width != 0 && self.sn76489_shift_width != EMULATED_SHIFT_WIDTH {
            log::warn!(
                "VGM header declares a {}-bit LFSR; emulating {} bits",
                self.sn76489_shift_width,
                EMULATED_SHIFT_WIDTH
            );
        }
    }

    /// Version as "major.minor"
    pub fn version_string(&self) -> String {
        format!("{:x}.{:02x}", self.version >> 8, self.version & 0xFF)
    }

    /// Playing time of the declared sample count at 44.1 kHz
    pub fn duration_seconds(&self) -> f32 {
        self.total_samples as f32 / super::VGM_SAMPLE_RATE as f32
    }
}
