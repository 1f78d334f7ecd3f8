//! VGM File Loader
//!
//! Loads VGM logs from disk with transparent gzip (`.vgz`) support.

use super::header::VgmHeader;
use crate::{compression, Result, Sn76489Error};
use std::fs;
use std::path::Path;

/// A validated, decompressed VGM image
#[derive(Debug, Clone)]
pub struct Vgm {
    header: VgmHeader,
    data: Vec<u8>,
}

impl Vgm {
    /// Build from raw file contents, decompressing gzip containers first
    pub fn from_bytes(file_data: &[u8]) -> Result<Self> {
        let data = compression::decompress_if_needed(file_data)?;
        let header = VgmHeader::parse(&data)?;
        Ok(Vgm { header, data })
    }

    /// Parsed header
    pub fn header(&self) -> &VgmHeader {
        &self.header
    }

    /// The complete decompressed image, header included
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Command stream bytes, from the data offset to the end of the image
    pub fn commands(&self) -> &[u8] {
        &self.data[self.header.data_offset..]
    }
}

/// Loads VGM files from disk
pub struct VgmLoader;

impl VgmLoader {
    /// Load a VGM or VGZ file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vgm> {
        let path = path.as_ref();
        let file_data = Self::read_file(path)?;

        let compressed = compression::is_gzip_compressed(&file_data);
        let vgm = Vgm::from_bytes(&file_data)?;

        log::info!(
            "Loaded {} ({}VGM {}, {} bytes, PSG clock {} Hz, {} samples)",
            path.display(),
            if compressed { "gzip " } else { "" },
            vgm.header.version_string(),
            vgm.data.len(),
            vgm.header.sn76489_clock,
            vgm.header.total_samples
        );
        Ok(vgm)
    }

    /// Decode only the header of a VGM or VGZ file
    ///
    /// Unlike [`load`](Self::load) this accepts logs without an SN76489
    /// clock, so they can still be inspected.
    pub fn read_header<P: AsRef<Path>>(path: P) -> Result<VgmHeader> {
        let file_data = Self::read_file(path.as_ref())?;
        let data = compression::decompress_if_needed(&file_data)?;
        VgmHeader::read(&data)
    }

    fn read_file(path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| {
            Sn76489Error::InvalidVgm(format!("failed to read '{}': {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vgm::header::VGM_MAGIC;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn minimal_vgm() -> Vec<u8> {
        let mut data = vec![0u8; 0x40];
        data[0..4].copy_from_slice(VGM_MAGIC);
        data[0x0C..0x10].copy_from_slice(&3_579_545u32.to_le_bytes());
        data[0x18..0x1C].copy_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0x70, 0x66]);
        data
    }

    #[test]
    fn test_from_plain_bytes() {
        let vgm = Vgm::from_bytes(&minimal_vgm()).unwrap();
        assert_eq!(vgm.header().sn76489_clock, 3_579_545);
        assert_eq!(vgm.commands(), &[0x70, 0x66]);
    }

    #[test]
    fn test_from_gzip_bytes() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&minimal_vgm()).unwrap();
        let compressed = encoder.finish().unwrap();

        let vgm = Vgm::from_bytes(&compressed).unwrap();
        assert_eq!(vgm.data(), minimal_vgm().as_slice());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&minimal_vgm()).unwrap();
        let vgm = VgmLoader::load(file.path()).unwrap();
        assert_eq!(vgm.header().total_samples, 1);
    }

    #[test]
    fn test_read_header_of_log_without_psg() {
        let mut data = minimal_vgm();
        data[0x0C..0x10].copy_from_slice(&0u32.to_le_bytes());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        assert!(matches!(
            VgmLoader::load(file.path()),
            Err(Sn76489Error::MissingPsgClock)
        ));
        let header = VgmLoader::read_header(file.path()).unwrap();
        assert_eq!(header.sn76489_clock, 0);
        assert_eq!(header.total_samples, 1);
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let err = VgmLoader::load("/nonexistent/song.vgm").unwrap_err();
        assert!(matches!(err, Sn76489Error::InvalidVgm(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
