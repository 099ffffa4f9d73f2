//! Waveform buffers and sphere payload images

use crate::layout::{
    waveform_slot, BYTES_PER_SAMPLE, PAYLOAD_BYTES, SAMPLES_PER_WAVEFORM, WAVEFORM_NAME_LEN,
    WAVEFORM_RECORD_BYTES, WAVEFORM_SAMPLE_BYTES,
};

/// One waveform's samples, as stored on flash
///
/// Kept as raw little-endian bytes so a real-time load is a single flash
/// read straight into the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Waveform {
    bytes: [u8; WAVEFORM_SAMPLE_BYTES],
}

impl Default for Waveform {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Waveform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Waveform")
            .field("first", &self.sample(0))
            .field("last", &self.sample(SAMPLES_PER_WAVEFORM - 1))
            .finish()
    }
}

impl Waveform {
    /// Create a silent waveform
    pub const fn new() -> Self {
        Self {
            bytes: [0; WAVEFORM_SAMPLE_BYTES],
        }
    }

    /// Create a waveform from samples
    ///
    /// Extra samples are dropped, missing samples are silent.
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut waveform = Self::new();
        encode_samples(&mut waveform.bytes, samples);
        waveform
    }

    /// Sample at `index`, or 0 past the end
    pub fn sample(&self, index: usize) -> i16 {
        if index >= SAMPLES_PER_WAVEFORM {
            return 0;
        }
        let at = index * BYTES_PER_SAMPLE;
        i16::from_le_bytes([self.bytes[at], self.bytes[at + 1]])
    }

    /// Iterate over all samples
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
    }

    /// Raw sample bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw sample bytes, for reading straight from flash
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Full payload image of a sphere (everything after the signature)
///
/// 27 waveform records in row-major order, each a reserved name field
/// followed by the samples.
#[derive(Clone, PartialEq, Eq)]
pub struct SpherePayload {
    bytes: [u8; PAYLOAD_BYTES],
}

impl Default for SpherePayload {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SpherePayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpherePayload")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SpherePayload {
    /// Create a payload with every waveform silent and unnamed
    pub const fn new() -> Self {
        Self {
            bytes: [0; PAYLOAD_BYTES],
        }
    }

    /// Fill the waveform record at (x, y, z), coordinates clamped
    ///
    /// The name is truncated or zero-padded to the name field.
    pub fn set_waveform(&mut self, x: i16, y: i16, z: i16, name: &str, samples: &[i16]) {
        let start = waveform_slot(x, y, z) * WAVEFORM_RECORD_BYTES;
        let record = &mut self.bytes[start..start + WAVEFORM_RECORD_BYTES];
        let (name_field, sample_field) = record.split_at_mut(WAVEFORM_NAME_LEN);

        name_field.fill(0);
        let name = name.as_bytes();
        let len = name.len().min(WAVEFORM_NAME_LEN);
        name_field[..len].copy_from_slice(&name[..len]);

        sample_field.fill(0);
        encode_samples(sample_field, samples);
    }

    /// Samples of the waveform at (x, y, z), coordinates clamped
    pub fn waveform(&self, x: i16, y: i16, z: i16) -> Waveform {
        let start = waveform_slot(x, y, z) * WAVEFORM_RECORD_BYTES + WAVEFORM_NAME_LEN;
        let mut waveform = Waveform::new();
        waveform
            .as_mut_bytes()
            .copy_from_slice(&self.bytes[start..start + WAVEFORM_SAMPLE_BYTES]);
        waveform
    }

    /// Raw payload bytes, as written to flash
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn encode_samples(dest: &mut [u8], samples: &[i16]) {
    for (chunk, sample) in dest
        .chunks_exact_mut(BYTES_PER_SAMPLE)
        .zip(samples.iter().take(SAMPLES_PER_WAVEFORM))
    {
        chunk.copy_from_slice(&sample.to_le_bytes());
    }
}
