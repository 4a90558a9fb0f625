//! WAV export
//!
//! Audio is written as 16-bit mono PCM.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use rootstar_sonify_core::types::AudioBuffer;

/// WAV export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output file could not be created
    #[error("Failed to create output file: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the WAV encoder
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),
}

/// WAV header for a 16-bit mono stream at `sample_rate`
#[must_use]
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Encode `audio` as WAV into any seekable writer.
///
/// # Errors
///
/// Returns [`ExportError::Wav`] if writing fails.
pub fn encode_wav<W: Write + Seek>(audio: &AudioBuffer, writer: W) -> Result<(), ExportError> {
    let mut wav = WavWriter::new(writer, wav_spec(audio.sample_rate()))?;
    for sample in audio.to_pcm16() {
        wav.write_sample(sample)?;
    }
    wav.finalize()?;
    Ok(())
}

/// Write `audio` to a WAV file at `path`.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be created and
/// [`ExportError::Wav`] if writing fails.
pub fn write_wav(path: impl AsRef<Path>, audio: &AudioBuffer) -> Result<(), ExportError> {
    let path = path.as_ref();
    encode_wav(audio, BufWriter::new(File::create(path)?))?;
    tracing::info!(path = %path.display(), samples = audio.len(), "wrote WAV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_wav_roundtrip_in_memory() {
        let audio = AudioBuffer::new(vec![0.0, 0.5, -0.5, 1.2], 22_050).unwrap();
        let mut cursor = Cursor::new(Vec::new());
        encode_wav(&audio, &mut cursor).unwrap();

        cursor.set_position(0);
        let mut reader = hound::WavReader::new(cursor).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(decoded, vec![0, 16384, -16384, 32767]);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let audio = AudioBuffer::new(vec![0.0; 8], 8000).unwrap();
        let err = write_wav("/nonexistent-dir/out.wav", &audio).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
