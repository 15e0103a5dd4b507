use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Number of bars in a meter snapshot
pub const METER_BARS: usize = 12;

/// Tick interval for the meter task
pub const METER_TICK: Duration = Duration::from_millis(100);

/// One rendering of the input level as bar heights in `0.0..=1.0`.
///
/// Cosmetic feedback that capture is live; nothing downstream consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterSnapshot {
    pub bars: Vec<f32>,
}

impl MeterSnapshot {
    pub fn quiet() -> Self {
        Self {
            bars: vec![0.0; METER_BARS],
        }
    }

    fn from_level(level: f32) -> Self {
        let mid = (METER_BARS - 1) as f32 / 2.0;
        let bars = (0..METER_BARS)
            .map(|i| {
                // Taper towards the edges so the meter reads as a pulse
                let taper = 1.0 - (i as f32 - mid).abs() / mid * 0.6;
                (level * taper * 4.0).clamp(0.0, 1.0)
            })
            .collect();

        Self { bars }
    }
}

/// Shared input level, updated per captured frame and sampled by a ticker.
#[derive(Debug, Clone, Default)]
pub struct LevelMeter {
    level_bits: Arc<AtomicU32>,
}

impl LevelMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the RMS level of one frame of samples.
    pub fn update(&self, samples: &[i16]) {
        self.level_bits
            .store(frame_rms(samples).to_bits(), Ordering::Relaxed);
    }

    pub fn level(&self) -> f32 {
        f32::from_bits(self.level_bits.load(Ordering::Relaxed))
    }

    /// Spawn the meter ticker.
    ///
    /// Publishes a fresh snapshot every [`METER_TICK`] while `capturing` stays
    /// true; the task re-checks the flag each tick and terminates itself once
    /// capture stops, publishing a final quiet snapshot.
    pub fn spawn_ticker(&self, capturing: Arc<AtomicBool>) -> watch::Receiver<MeterSnapshot> {
        let (tx, rx) = watch::channel(MeterSnapshot::quiet());
        let level_bits = Arc::clone(&self.level_bits);

        tokio::spawn(async move {
            let mut tick = tokio::time::interval(METER_TICK);

            loop {
                tick.tick().await;

                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let level = f32::from_bits(level_bits.load(Ordering::Relaxed));
                if tx.send(MeterSnapshot::from_level(level)).is_err() {
                    break;
                }
            }

            let _ = tx.send(MeterSnapshot::quiet());
        });

        rx
    }
}

/// RMS level of a sample buffer, normalized to `0.0..=1.0`.
pub fn frame_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&s| {
            let normalized = s as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    (sum_squares / samples.len() as f64).sqrt() as f32
}
