//! VGM Format Parsing and Playback
//!
//! Reads SN76489-only VGM logs and replays them through a chip backend.

pub mod command;
pub mod cycle_counter;
pub mod header;
pub mod interpreter;
pub mod loader;

pub use command::Command;
pub use header::VgmHeader;
pub use interpreter::{RenderOutput, VgmInterpreter};
pub use loader::{Vgm, VgmLoader};

use crate::backend::Sn76489Backend;
use crate::sn76489::Sn76489;
use crate::Result;
use std::path::Path;

/// Output sample rate every VGM log is timed against
pub const VGM_SAMPLE_RATE: u32 = 44_100;

/// Chip cycles per output sample for a given master clock (remainder dropped)
pub fn cycles_per_sample(clock: u32) -> u32 {
    clock / VGM_SAMPLE_RATE
}

/// Load a VGM or VGZ file from disk
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vgm> {
    VgmLoader::load(path)
}

/// Decode the header of a VGM or VGZ file without requiring an SN76489 clock
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<VgmHeader> {
    VgmLoader::read_header(path)
}

/// Render a loaded log through a fresh power-on SN76489
pub fn render(vgm: &Vgm) -> Result<RenderOutput> {
    render_with(vgm, Sn76489::new())
}

/// Render a loaded log through the given backend
///
/// The backend is reset to power-on state first, so host settings such as
/// channel mutes carry over but register state from earlier use does not.
pub fn render_with<B: Sn76489Backend>(vgm: &Vgm, mut backend: B) -> Result<RenderOutput> {
    backend.reset();
    let mut interpreter = VgmInterpreter::new(vgm.data(), vgm.header(), backend);
    match interpreter.run() {
        Ok(output) => {
            log::info!(
                "Rendered {} samples ({:.2}s) from {} commands",
                output.samples.len(),
                output.duration_seconds(),
                output.commands_executed
            );
            Ok(output)
        }
        Err(e) => {
            log::info!(
                "Rendering stopped after {} of {} samples",
                interpreter.rendered(),
                vgm.header().total_samples
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_per_sample() {
        assert_eq!(cycles_per_sample(3_579_545), 81);
        assert_eq!(cycles_per_sample(4_000_000), 90);
        assert_eq!(cycles_per_sample(44_099), 0);
    }

    fn silent_vgm(total_samples: u32) -> Vgm {
        let mut data = vec![0u8; 0x40];
        data[0..4].copy_from_slice(header::VGM_MAGIC);
        data[0x0C..0x10].copy_from_slice(&3_579_545u32.to_le_bytes());
        data[0x18..0x1C].copy_from_slice(&total_samples.to_le_bytes());
        data.extend_from_slice(&[0x61, 0x00, 0x01, 0x66]);
        Vgm::from_bytes(&data).unwrap()
    }

    #[test]
    fn test_render_with_starts_from_power_on() {
        let mut chip = Sn76489::new();
        chip.write_register(0x90); // tone 0 loud before the log starts
        chip.advance(1000);

        let output = render_with(&silent_vgm(256), chip).unwrap();
        assert_eq!(output.samples.len(), 256);
        assert!(output.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_render_with_keeps_mutes() {
        let mut data = silent_vgm(10).data().to_vec();
        data.truncate(0x40);
        data.extend_from_slice(&[0x50, 0x90, 0x79, 0x66]);
        let vgm = Vgm::from_bytes(&data).unwrap();

        let mut chip = Sn76489::new();
        chip.set_channel_mute(0, true);
        let output = render_with(&vgm, chip).unwrap();
        assert_eq!(output.samples, vec![0; 10]);
    }
}
