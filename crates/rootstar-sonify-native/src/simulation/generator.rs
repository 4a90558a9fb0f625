//! Synthetic EEG for each simulated brain state
//!
//! Every state is a sum of band-limited noise components plus, for N1, REM
//! and seizure, characteristic transients. Randomness is injected by the
//! caller, so a seeded RNG reproduces a signal bit for bit.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use rootstar_sonify_core::types::{BrainState, EegSignal};
use rootstar_sonify_core::{SignalError, SignalResult};

use super::transients::{
    add_at_random_onsets, sawtooth_burst, seizure_envelope, spike_train, vertex_wave,
    SAWTOOTH_BURST_COUNT, VERTEX_WAVE_COUNT,
};
use crate::processing::filters::bandpass;

/// Gain applied to the enveloped spike-wave train
const SEIZURE_SPIKE_GAIN: f64 = 3.0;

/// One band-limited noise component of a state's background rhythm
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rhythm {
    /// Lower band edge (Hz)
    pub low_hz: f64,
    /// Upper band edge (Hz)
    pub high_hz: f64,
    /// Scale applied after filtering
    pub amplitude: f64,
}

impl Rhythm {
    const fn new(low_hz: f64, high_hz: f64, amplitude: f64) -> Self {
        Self { low_hz, high_hz, amplitude }
    }
}

const DELTA: (f64, f64) = (0.5, 4.0);
const THETA: (f64, f64) = (4.0, 8.0);
const ALPHA: (f64, f64) = (8.0, 13.0);
const BETA: (f64, f64) = (13.0, 30.0);

const AWAKE_RHYTHMS: [Rhythm; 4] = [
    Rhythm::new(DELTA.0, DELTA.1, 0.3),
    Rhythm::new(THETA.0, THETA.1, 0.4),
    Rhythm::new(ALPHA.0, ALPHA.1, 1.0),
    Rhythm::new(BETA.0, BETA.1, 0.2),
];
const N1_RHYTHMS: [Rhythm; 2] = [Rhythm::new(THETA.0, THETA.1, 1.0), Rhythm::new(ALPHA.0, ALPHA.1, 0.3)];
const N3_RHYTHMS: [Rhythm; 2] = [Rhythm::new(DELTA.0, DELTA.1, 2.0), Rhythm::new(THETA.0, THETA.1, 0.3)];
const REM_RHYTHMS: [Rhythm; 3] = [
    Rhythm::new(THETA.0, THETA.1, 1.0),
    Rhythm::new(ALPHA.0, ALPHA.1, 0.2),
    Rhythm::new(BETA.0, BETA.1, 0.3),
];
/// Broadband background under the spike-wave discharge
const SEIZURE_RHYTHMS: [Rhythm; 1] = [Rhythm::new(0.5, 30.0, 0.2)];

/// Background rhythms summed for a brain state
#[must_use]
pub fn background_rhythms(state: BrainState) -> &'static [Rhythm] {
    match state {
        BrainState::Awake => &AWAKE_RHYTHMS,
        BrainState::N1 => &N1_RHYTHMS,
        BrainState::N3 => &N3_RHYTHMS,
        BrainState::Rem => &REM_RHYTHMS,
        BrainState::Seizure => &SEIZURE_RHYTHMS,
    }
}

/// Synthetic EEG generator for a fixed sample rate and duration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EegSimulator {
    sample_rate: f64,
    duration_s: f64,
    n_samples: usize,
}

impl EegSimulator {
    /// Create a generator producing `round(sample_rate * duration_s)` samples.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] for a non-finite or
    /// non-positive rate or duration, or when they round to zero samples.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(sample_rate: f64, duration_s: f64) -> SignalResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SignalError::invalid("sample_rate", sample_rate, "a finite rate > 0 Hz"));
        }
        if !(duration_s.is_finite() && duration_s > 0.0) {
            return Err(SignalError::invalid("duration", duration_s, "a finite duration > 0 s"));
        }
        let n_samples = (sample_rate * duration_s).round() as usize;
        if n_samples == 0 {
            return Err(SignalError::invalid(
                "duration",
                duration_s,
                "at least one sample at the given rate",
            ));
        }
        Ok(Self { sample_rate, duration_s, n_samples })
    }

    /// Sample rate (Hz)
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Requested duration (s)
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration_s
    }

    /// Samples per generated signal
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// White Gaussian noise band-passed to `[low_hz, high_hz]` and scaled.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the band does not fit
    /// below Nyquist.
    pub fn band_limited_noise<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        low_hz: f64,
        high_hz: f64,
        amplitude: f64,
    ) -> SignalResult<Vec<f64>> {
        let noise: Vec<f64> = (0..self.n_samples).map(|_| StandardNormal.sample(&mut *rng)).collect();
        let filtered = bandpass(&EegSignal::new(noise, self.sample_rate)?, low_hz, high_hz)?;
        Ok(filtered.into_samples().into_iter().map(|x| x * amplitude).collect())
    }

    /// Generate a signal for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if a background band is at
    /// or above Nyquist, or the signal is too short for the state's
    /// transients.
    pub fn generate<R: Rng + ?Sized>(&self, state: BrainState, rng: &mut R) -> SignalResult<EegSignal> {
        let mut samples = vec![0.0; self.n_samples];
        for rhythm in background_rhythms(state) {
            let component = self.band_limited_noise(rng, rhythm.low_hz, rhythm.high_hz, rhythm.amplitude)?;
            for (s, c) in samples.iter_mut().zip(component) {
                *s += c;
            }
        }

        match state {
            BrainState::Awake | BrainState::N3 => {}
            BrainState::N1 => add_at_random_onsets(&mut samples, &vertex_wave(), VERTEX_WAVE_COUNT, rng)?,
            BrainState::Rem => {
                add_at_random_onsets(&mut samples, &sawtooth_burst(), SAWTOOTH_BURST_COUNT, rng)?;
            }
            BrainState::Seizure => {
                let train = spike_train(self.n_samples, self.sample_rate, self.duration_s);
                let envelope = seizure_envelope(self.n_samples);
                for ((s, spike), env) in samples.iter_mut().zip(train).zip(envelope) {
                    *s += SEIZURE_SPIKE_GAIN * spike * env;
                }
            }
        }

        tracing::debug!(
            state = state.name(),
            sample_rate = self.sample_rate,
            samples = self.n_samples,
            "generated synthetic EEG"
        );
        EegSignal::new(samples, self.sample_rate)
    }
}

/// Generate `round(sample_rate * duration_s)` samples of synthetic EEG for
/// `state`.
///
/// # Errors
///
/// See [`EegSimulator::new`] and [`EegSimulator::generate`].
pub fn generate<R: Rng + ?Sized>(
    state: BrainState,
    sample_rate: f64,
    duration_s: f64,
    rng: &mut R,
) -> SignalResult<EegSignal> {
    EegSimulator::new(sample_rate, duration_s)?.generate(state, rng)
}
