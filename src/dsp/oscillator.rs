//! Band-limited oscillators for the four wave types.

use std::f64::consts::PI;

use crate::ast::WaveType;

/// A phase-accumulating oscillator with PolyBLEP anti-aliasing on the
/// discontinuous shapes.
#[derive(Debug, Clone)]
pub struct Oscillator {
    wave_type: WaveType,
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(wave_type: WaveType, frequency: f64, sample_rate: f64) -> Self {
        Oscillator {
            wave_type,
            frequency,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Phase increment per sample.
    fn phase_inc(&self) -> f64 {
        self.frequency / self.sample_rate
    }

    pub fn next_sample(&mut self) -> f64 {
        let inc = self.phase_inc();
        let sample = match self.wave_type {
            WaveType::Sine => (2.0 * PI * self.phase).sin(),
            WaveType::Sawtooth => 2.0 * self.phase - 1.0 - poly_blep(self.phase, inc),
            WaveType::Square => {
                let naive = if self.phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(self.phase, inc) - poly_blep((self.phase + 0.5) % 1.0, inc)
            }
            // Piecewise linear: -1 → +1 over the first half, back over the second.
            WaveType::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase = (self.phase + inc).rem_euclid(1.0);
        sample
    }
}

/// PolyBLEP correction around a step discontinuity. `t` is the phase in
/// `[0, 1)`, `dt` the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(wave_type: WaveType) -> f64 {
        let mut osc = Oscillator::new(wave_type, 440.0, 44100.0);
        (0..44100).map(|_| osc.next_sample().abs()).fold(0.0, f64::max)
    }

    #[test]
    fn sine_starts_at_zero() {
        let mut osc = Oscillator::new(WaveType::Sine, 440.0, 44100.0);
        assert!(osc.next_sample().abs() < 1e-10);
    }

    #[test]
    fn shapes_stay_in_range() {
        assert!(peak(WaveType::Sine) <= 1.0);
        assert!(peak(WaveType::Triangle) <= 1.0);
        assert!(peak(WaveType::Sawtooth) <= 1.5);
        assert!(peak(WaveType::Square) <= 1.5);
    }

    #[test]
    fn phase_wraps_above_the_sample_rate() {
        for wave in WaveType::ALL {
            let mut osc = Oscillator::new(wave, 450_560.0, 8000.0);
            for _ in 0..1000 {
                assert!(osc.next_sample().is_finite());
                assert!((0.0..1.0).contains(&osc.phase), "{wave}: phase {}", osc.phase);
            }
        }
    }

    #[test]
    fn completes_cycles_at_its_frequency() {
        // 100 Hz at 1 kHz: the sine crosses upward through zero every 10 samples.
        let mut osc = Oscillator::new(WaveType::Sine, 100.0, 1000.0);
        let samples: Vec<f64> = (0..1000).map(|_| osc.next_sample()).collect();
        let upward = samples.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
        assert!((98..=100).contains(&upward), "{upward} cycles");
    }
}
