//! SN76489 PSG Emulation Domain
//!
//! Core Texas Instruments SN76489 Programmable Sound Generator emulation:
//! three square-wave tone channels, one LFSR noise channel, the two-byte
//! latch/data register protocol and the attenuation mixer.
//!
//! Implementation:
//! - `chip` - Cycle-exact core with the shared /16 prescaler

// Internal modules
pub mod channel;
pub mod chip;
pub mod mixer;
pub mod noise;
pub mod registers;
pub mod tables;
pub mod tone;

// Re-export public API
pub use channel::{Channel, DataWidth, RegisterKind};
pub use chip::Sn76489;
pub use noise::NoiseChannel;
pub use registers::{LatchFlags, RegisterWrite};
pub use tone::ToneChannel;
