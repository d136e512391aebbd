//! Fixed dynamic-range compression applied between the decoder and the output.
//!
//! The stage follows the classic feed-forward design: per-frame peak
//! detection, a soft-knee static curve and one-pole attack/release smoothing
//! of the resulting gain. Parameters are fixed; the stage can only be bypassed.

use std::time::Duration;

use rodio::source::SeekError;
use rodio::{ChannelCount, SampleRate, Source};

/// Peaks below this are treated as silence (about -180 dBFS).
const SILENCE: f32 = 1e-9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CompressorParams {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack: Duration,
    pub release: Duration,
}

impl CompressorParams {
    /// Loudness-leveling preset: -24 dB threshold, 30 dB knee, 12:1.
    pub const LEVELING: Self = Self {
        threshold_db: -24.0,
        knee_db: 30.0,
        ratio: 12.0,
        attack: Duration::from_millis(3),
        release: Duration::from_millis(250),
    };

    /// Output level for an input level, both in dBFS.
    pub fn curve(&self, input_db: f32) -> f32 {
        let over = input_db - self.threshold_db;
        let slope = 1.0 / self.ratio - 1.0;

        if 2.0 * over < -self.knee_db {
            input_db
        } else if self.knee_db > 0.0 && 2.0 * over.abs() <= self.knee_db {
            let x = over + self.knee_db / 2.0;
            input_db + slope * x * x / (2.0 * self.knee_db)
        } else {
            self.threshold_db + over / self.ratio
        }
    }

    /// Gain (dB, never positive) the static curve asks for at `peak`.
    pub fn target_gain_db(&self, peak: f32) -> f32 {
        if peak <= SILENCE {
            return 0.0;
        }
        let level_db = 20.0 * peak.log10();
        (self.curve(level_db) - level_db).min(0.0)
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self::LEVELING
    }
}

fn smoothing_coeff(time: Duration, sample_rate: SampleRate) -> f32 {
    let frames = time.as_secs_f32() * sample_rate as f32;
    if frames <= 0.0 {
        0.0
    } else {
        (-1.0 / frames).exp()
    }
}

fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// `Source` adapter that compresses `inner` with [`CompressorParams`].
///
/// All channels of a frame share one gain so the stereo image does not move.
pub struct Compressor<S> {
    inner: S,
    params: CompressorParams,
    gain_db: f32,
    attack_coeff: f32,
    release_coeff: f32,
    coeff_rate: SampleRate,
    frame: Vec<f32>,
    cursor: usize,
}

impl<S: Source> Compressor<S> {
    pub fn new(inner: S, params: CompressorParams) -> Self {
        let rate = inner.sample_rate();
        Self {
            attack_coeff: smoothing_coeff(params.attack, rate),
            release_coeff: smoothing_coeff(params.release, rate),
            coeff_rate: rate,
            inner,
            params,
            gain_db: 0.0,
            frame: Vec::new(),
            cursor: 0,
        }
    }

    fn refill(&mut self) -> bool {
        self.frame.clear();
        self.cursor = 0;

        let channels = self.inner.channels().max(1) as usize;
        for _ in 0..channels {
            match self.inner.next() {
                Some(sample) => self.frame.push(sample),
                None => break,
            }
        }
        if self.frame.is_empty() {
            return false;
        }

        let rate = self.inner.sample_rate();
        if rate != self.coeff_rate {
            self.attack_coeff = smoothing_coeff(self.params.attack, rate);
            self.release_coeff = smoothing_coeff(self.params.release, rate);
            self.coeff_rate = rate;
        }

        let peak = self.frame.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let target = self.params.target_gain_db(peak);
        let coeff = if target < self.gain_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.gain_db = target + coeff * (self.gain_db - target);

        let gain = db_to_linear(self.gain_db);
        for sample in &mut self.frame {
            *sample *= gain;
        }
        true
    }
}

impl<S: Source> Iterator for Compressor<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.cursor >= self.frame.len() && !self.refill() {
            return None;
        }
        let sample = self.frame[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

impl<S: Source> Source for Compressor<S> {
    fn current_span_len(&self) -> Option<usize> {
        let buffered = self.frame.len() - self.cursor;
        self.inner.current_span_len().map(|len| len + buffered)
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.inner.try_seek(pos)?;
        self.frame.clear();
        self.cursor = 0;
        Ok(())
    }
}

/// The enhancement stage placed in front of the output, built once per sink.
#[derive(Debug, Copy, Clone)]
pub struct EnhancementChain {
    params: CompressorParams,
    enabled: bool,
}

impl EnhancementChain {
    pub fn new(enabled: bool) -> Self {
        Self {
            params: CompressorParams::LEVELING,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Route `source` through the chain.
    pub fn apply<S>(&self, source: S) -> Box<dyn Source + Send>
    where
        S: Source + Send + 'static,
    {
        if self.enabled {
            Box::new(Compressor::new(source, self.params))
        } else {
            Box::new(source)
        }
    }
}
