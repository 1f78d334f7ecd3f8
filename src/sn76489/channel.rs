//! Channel contract shared by the tone and noise generators

/// Which register of a channel a write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    /// Tone period, or noise control for the noise channel
    Period,
    /// 4-bit attenuation
    Volume,
}

/// How many data bits a write carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataWidth {
    /// 4 data bits from a latch/data byte
    Narrow,
    /// 6 data bits from a data-continuation byte
    Wide,
}

/// Common interface of the SN76489 sound channels
///
/// Clocking is not part of the contract: the noise channel needs a view of
/// tone channel 2 to reload its counter, so each variant exposes its own
/// `clock` and the chip drives them explicitly.
pub trait Channel {
    /// Current attenuation index into the volume table
    ///
    /// Returns [`ATTENUATION_OFF`](super::tables::ATTENUATION_OFF) while the
    /// output phase is low, the programmed volume while it is high.
    fn output_level(&self) -> u8;

    /// Apply a register write routed to this channel by the latch
    fn write_data(&mut self, kind: RegisterKind, width: DataWidth, data: u8);

    /// Programmed 4-bit attenuation
    fn volume(&self) -> u8;
}
