use std::{time::{Instant, Duration}, fmt::Display, borrow::Cow};

use hashbrown::HashMap;

/// Tracks statistics of multiple frame profiles
#[derive(Clone, Debug, Default)]
pub struct FrameProfileStatistics {
    /// Entry information
    values: HashMap<String, Vec<Duration>>,
    /// Entry keys, in order
    keys: Vec<String>,
    /// Number of profiles added
    frames: usize,
}

impl FrameProfileStatistics {
    pub fn add(&mut self, tp: &FrameProfile) {
        self.frames += 1;
        let mut last_time = tp.start();
        for stamp in tp.stamps.iter() {
            let name = stamp.name();

            let duration = stamp.timestamp.saturating_duration_since(last_time);
            last_time = stamp.timestamp;

            match self.values.get_mut(name) {
                Some(entry) => entry.push(duration),
                None => {
                    self.values.insert(name.into(), vec![duration]);
                    self.keys.push(name.into());
                },
            }
        }
    }

    /// Number of frames recorded
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Stage names, in the order they were first seen
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.as_str())
    }

    /// Mean duration of a stage
    pub fn mean(&self, stage: &str) -> Option<Duration> {
        let entry = self.values.get(stage)?;
        if entry.is_empty() {
            return None;
        }
        Some(entry.iter().sum::<Duration>() / entry.len() as u32)
    }
}

impl Display for FrameProfileStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max_name = self.keys
            .iter()
            .map(|stamp| stamp.len())
            .max()
            .unwrap_or(0);

        writeln!(f, " # {:width$} {:>15} {:>15} {:>15} {:>15}", "Name", "Average", "Min", "Max", "Std.dev", width=max_name)?;

        for (i, key) in self.keys.iter().enumerate() {
            let Some(entry) = self.values.get(key) else { continue };
            let mut max = Duration::ZERO;
            let mut min = Duration::MAX;
            let mut sum = 0.;
            let mut sq_sum = 0.;
            for d in entry.iter().copied() {
                let d_s = d.as_secs_f64();
                sum += d_s;
                sq_sum += d_s * d_s;
                max = max.max(d);
                min = min.min(d);
            }
            let len = entry.len().max(1) as f64;
            let avg = sum / len;
            let stddev = (sq_sum / len - avg * avg).max(0.).sqrt();

            writeln!(f, "{:2} {:width$} {:12.6} ms {:12.6} ms {:12.6} ms {:12.6} ms", i, key, avg * 1e3, min.as_secs_f64() * 1e3, max.as_secs_f64() * 1e3, stddev * 1e3, width=max_name)?;
        }

        Ok(())
    }
}

/// Named timestamps for the stages of one frame
#[derive(Clone, Debug)]
pub struct FrameProfile {
    /// Start timestamp
    now: Instant,
    /// Named timestamps
    stamps: Vec<FrameProfileEntry>,
}

impl Default for FrameProfile {
    fn default() -> Self {
        Self {
            now: Instant::now(),
            stamps: Default::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct FrameProfileEntry {
    /// Entry name
    name: Cow<'static, str>,
    /// Entry timestamp
    timestamp: Instant,
}

impl FrameProfileEntry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl FrameProfile {
    /// Get start time
    pub fn start(&self) -> Instant {
        self.now
    }

    /// Clear all records
    pub fn clear(&mut self) {
        self.stamps.clear();
        self.now = Instant::now();
    }

    /// Record a timestamp right now
    #[inline]
    pub fn stamp(&mut self, name: impl Into<Cow<'static, str>>) {
        self.stamp_at(name, Instant::now())
    }

    /// Mark a specific time
    pub fn stamp_at(&mut self, name: impl Into<Cow<'static, str>>, timestamp: Instant) {
        self.stamps.push(FrameProfileEntry {
            name: name.into(),
            timestamp,
        });
    }

    /// Recorded stage names, in order
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.stamps.iter().map(|stamp| stamp.name())
    }

    /// Get duration from [start](Self::start) to last recorded timestamp
    pub fn total_duration(&self) -> Duration {
        match self.stamps.last() {
            Some(last) => last.timestamp.saturating_duration_since(self.now),
            None => Duration::ZERO,
        }
    }
}

impl Display for FrameProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stamps = &self.stamps;

        // Find maximums for scaling output
        let max_name_length = stamps.iter()
            .map(|stamp| stamp.name.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let total_time = self.total_duration();

        let mut last_time = self.now;
        for (i, stamp) in stamps.iter().enumerate() {
            let cumtime = stamp.timestamp.saturating_duration_since(self.now);
            let parttime = stamp.timestamp.saturating_duration_since(last_time);

            let percent = if total_time.is_zero() {
                0.
            } else {
                100. * parttime.as_secs_f64() / total_time.as_secs_f64()
            };

            writeln!(f, "{:2} {:width$} {:12.6} ms {:12.6} ms {:3.0}%",
                i,
                stamp.name,
                parttime.as_secs_f64() * 1000.,
                cumtime.as_secs_f64() * 1000.,
                percent,
                width=max_name_length
            )?;

            last_time = stamp.timestamp;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{FrameProfile, FrameProfileStatistics};

    #[test]
    fn stages_in_order() {
        let mut tp = FrameProfile::default();
        let start = tp.start();
        tp.stamp_at("filter", start + Duration::from_millis(2));
        tp.stamp_at("transform", start + Duration::from_millis(5));
        assert_eq!(tp.stages().collect::<Vec<_>>(), ["filter", "transform"]);
        assert_eq!(tp.total_duration(), Duration::from_millis(5));

        let text = tp.to_string();
        assert!(text.contains("filter"));
        assert!(text.contains("transform"));
    }

    #[test]
    fn empty_profile() {
        let tp = FrameProfile::default();
        assert_eq!(tp.total_duration(), Duration::ZERO);
        assert_eq!(tp.to_string(), "");
    }

    #[test]
    fn statistics_split_by_stage() {
        let mut stats = FrameProfileStatistics::default();
        for ms in [2, 4] {
            let mut tp = FrameProfile::default();
            let start = tp.start();
            tp.stamp_at("filter", start + Duration::from_millis(ms));
            tp.stamp_at("transform", start + Duration::from_millis(ms + 1));
            stats.add(&tp);
        }
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.stages().collect::<Vec<_>>(), ["filter", "transform"]);
        assert_eq!(stats.mean("filter"), Some(Duration::from_millis(3)));
        assert_eq!(stats.mean("transform"), Some(Duration::from_millis(1)));
        assert_eq!(stats.mean("publish"), None);
        assert!(stats.to_string().contains("Average"));
    }
}
