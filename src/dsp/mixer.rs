//! Mixer: sums voices into one buffer with master gain.

use super::voice::Voice;

/// A summing mixer over a fixed-length mono buffer.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 0.5,
            buffer: Vec::new(),
        }
    }

    /// Prepare a buffer of `num_samples` filled with zeros.
    pub fn clear(&mut self, num_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(num_samples, 0.0);
    }

    /// Add a sample at the given index. Samples past the end are dropped.
    pub fn add(&mut self, index: usize, sample: f64) {
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot += sample;
        }
    }

    /// Play a voice to completion into the buffer from its start offset.
    pub fn add_voice(&mut self, mut voice: Voice) {
        let start = voice.start;
        for offset in 0..voice.len() {
            let sample = voice.next_sample();
            self.add(start + offset, sample);
        }
    }

    /// The mixed output with master gain and soft clipping applied.
    pub fn output(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|&s| soft_clip(s * self.master_gain) as f32)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
