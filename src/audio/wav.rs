use crate::{DocChatError, Result};
use std::io::Cursor;

/// Assemble captured f32 samples into an in-memory mono 16-bit WAV file,
/// the payload shape the speech-to-text endpoint accepts.
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| DocChatError::IOError(format!("WAV writer: {e}")))?;

        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * i16::MAX as f32) as i16)
                .map_err(|e| DocChatError::IOError(format!("WAV write: {e}")))?;
        }

        writer
            .finalize()
            .map_err(|e| DocChatError::IOError(format!("WAV finalize: {e}")))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_wav_has_riff_header() {
        let samples = vec![0.0f32; 1600];
        let wav = encode_wav_mono16(&samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus two bytes per sample
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let samples = vec![2.0f32, -2.0];
        let wav = encode_wav_mono16(&samples, 16000).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded[0], i16::MAX);
        assert_eq!(decoded[1], -i16::MAX);
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        let wav = encode_wav_mono16(&[], 48000).unwrap();
        assert_eq!(wav.len(), 44);
    }
}
