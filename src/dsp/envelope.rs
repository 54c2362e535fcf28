//! The fixed tone envelope.
//!
//! Every tone has the same shape, scaled to its length: a rise to full level
//! over the first tenth of a note unit, then an exponential fall that reaches
//! [`FLOOR`] one fifth of a note unit before the tone ends. The shape has no
//! user-facing parameters.

/// Level the fall settles at.
pub const FLOOR: f64 = 0.0001;

const RISE_FRACTION: f64 = 0.1;
const FALL_LEAD_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct Envelope {
    rise_samples: usize,
    fall_samples: usize,
    total_samples: usize,
    position: usize,
}

impl Envelope {
    /// `sustain_ms` is the whole tone; `note_length_ms` is one sustain unit.
    pub fn new(sample_rate: f64, sustain_ms: f64, note_length_ms: f64) -> Self {
        let to_samples = |ms: f64| (ms.max(0.0) * sample_rate / 1000.0) as usize;
        let total_samples = to_samples(sustain_ms);
        Envelope {
            rise_samples: to_samples(RISE_FRACTION * note_length_ms),
            fall_samples: to_samples(sustain_ms - FALL_LEAD_FRACTION * note_length_ms)
                .clamp(1, total_samples.max(1)),
            total_samples,
            position: 0,
        }
    }

    /// Envelope level for the next sample, in `[0, 1]`.
    pub fn next_sample(&mut self) -> f64 {
        if self.is_finished() {
            return 0.0;
        }
        let t = self.position;
        self.position += 1;

        let rise = if t < self.rise_samples {
            t as f64 / self.rise_samples as f64
        } else {
            1.0
        };
        let fall = if t < self.fall_samples {
            FLOOR.powf(t as f64 / self.fall_samples as f64)
        } else {
            FLOOR
        };
        rise * fall
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.total_samples
    }

    /// Length of the whole tone in samples.
    pub fn len(&self) -> usize {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }
}
