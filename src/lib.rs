//! SN76489 PSG Emulator and VGM Renderer
//!
//! A cycle-exact emulator of the Texas Instruments SN76489 Programmable Sound
//! Generator as found in the Sega Master System, Game Gear and BBC Micro,
//! together with a VGM command-stream interpreter that replays a recorded
//! register log into 16-bit PCM.
//!
//! # Features
//! - Three square-wave tone channels with 10-bit period counters
//! - Noise channel with a 16-bit LFSR (white and periodic modes)
//! - Shared channel 3 / noise frequency mode
//! - Divide-by-16 prescaler shared by every channel
//! - Logarithmic attenuation table, raw (unnormalized) channel summing
//! - VGM / VGZ loading with transparent gzip decompression
//! - WAV and raw PCM export
//!
//! # Crate feature flags
//! - `emulator` (default): Core SN76489 emulator (`sn76489`)
//! - `vgm` (default): VGM header parsing, command interpreter, loader (`vgm`, `compression`)
//! - `export` (default): WAV / raw PCM writers (`export`)
//!
//! # Quick start
//! ## Core emulator only
//! ```no_run
//! use sn76489::Sn76489;
//! let mut chip = Sn76489::new();
//! chip.write_register(0x8E); // Latch tone 0 period, low nibble 0xE
//! chip.write_register(0x0F); // Period high bits
//! chip.write_register(0x90); // Tone 0 volume: loudest
//! chip.advance(81);
//! let sample = chip.sample();
//! ```
//!
//! ## Render a VGM file
//! ```no_run
//! # #[cfg(all(feature = "vgm", feature = "export"))]
//! # {
//! use sn76489::export::{write_wav, ExportConfig};
//! use sn76489::vgm::{load_file, render};
//! let vgm = load_file("song.vgz").unwrap();
//! let output = render(&vgm).unwrap();
//! write_wav("song.wav", &output.samples, &ExportConfig::default()).unwrap();
//! # }
//! ```

#![warn(missing_docs)]

pub mod backend; // Chip backend trait abstraction
pub mod sn76489; // SN76489 PSG Emulation (core)

#[cfg(feature = "vgm")]
pub mod compression; // Container Decompression (gzip)
#[cfg(feature = "export")]
pub mod export; // WAV / Raw PCM Output
#[cfg(feature = "vgm")]
pub mod vgm; // VGM Format Parsing and Playback

/// Error types for SN76489 emulator operations
#[derive(thiserror::Error, Debug)]
pub enum Sn76489Error {
    /// Input is not a usable VGM image
    #[error("Invalid VGM file: {0}")]
    InvalidVgm(String),

    /// Header declares no SN76489 clock
    #[error("PSG clock not defined in VGM header (offset 0x0C)")]
    MissingPsgClock,

    /// Command stream contains an opcode outside the supported set
    #[error("Unimplemented VGM command 0x{opcode:02X} at offset 0x{offset:X}")]
    UnknownCommand {
        /// Offending opcode
        opcode: u8,
        /// Byte offset of the opcode in the VGM image
        offset: usize,
    },

    /// Command operands run past the end of the data
    #[error("VGM command 0x{opcode:02X} at offset 0x{offset:X} is truncated")]
    TruncatedCommand {
        /// Opcode whose operands are missing
        opcode: u8,
        /// Byte offset of the opcode in the VGM image
        offset: usize,
    },

    /// Command stream ended before the declared sample count without an end marker
    #[error(
        "VGM data ended at offset 0x{offset:X} after {rendered} of {expected} samples without an end marker"
    )]
    UnexpectedEndOfData {
        /// Offset one past the last byte of the image
        offset: usize,
        /// Samples rendered before the data ran out
        rendered: usize,
        /// Sample count declared by the header
        expected: usize,
    },

    /// Decompression error
    #[error("Decompression error: {0}")]
    DecompressionError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl Sn76489Error {
    /// Process exit status for this error class
    ///
    /// - 3: unreadable or malformed input container
    /// - 4: no PSG clock in the header
    /// - 5: unsupported or broken command stream
    /// - 6: output could not be written
    /// - 1: invalid export configuration
    pub fn exit_code(&self) -> u8 {
        match self {
            Sn76489Error::InvalidVgm(_) | Sn76489Error::DecompressionError(_) => 3,
            Sn76489Error::MissingPsgClock => 4,
            Sn76489Error::UnknownCommand { .. }
            | Sn76489Error::TruncatedCommand { .. }
            | Sn76489Error::UnexpectedEndOfData { .. } => 5,
            Sn76489Error::AudioFileError(_) => 6,
            Sn76489Error::ConfigError(_) => 1,
        }
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, Sn76489Error>;

// Public API exports
pub use backend::Sn76489Backend;
pub use sn76489::Sn76489;

#[cfg(feature = "vgm")]
pub use compression::decompress_if_needed;
#[cfg(feature = "export")]
pub use export::{ExportConfig, ExportFormat};
#[cfg(feature = "vgm")]
pub use vgm::{load_file, render, RenderOutput, Vgm, VgmHeader};
