pub const DEFAULT_DURATION_MS: u32 = 2_000;
pub const DEFAULT_STEP_MS: u32 = 16;
pub const DEFAULT_RATIO_DIVISOR: u32 = 200;
pub const RATIO_STEP_MS: u32 = 1;

/// Reads the leading integer of a `data-count` value, so `"150+"` counts to 150.
pub fn parse_target(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<u64>().ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterStrategy {
    /// Reaches the target after a fixed wall-clock duration.
    FixedDuration { duration_ms: u32, step_ms: u32 },
    /// Adds `target / divisor` per tick, rounding up.
    RatioStep { divisor: u32, step_ms: u32 },
}

impl Default for CounterStrategy {
    fn default() -> Self {
        Self::FixedDuration {
            duration_ms: DEFAULT_DURATION_MS,
            step_ms: DEFAULT_STEP_MS,
        }
    }
}

impl CounterStrategy {
    pub fn ratio() -> Self {
        Self::RatioStep {
            divisor: DEFAULT_RATIO_DIVISOR,
            step_ms: RATIO_STEP_MS,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "duration" => Some(Self::default()),
            "ratio" => Some(Self::ratio()),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedDuration { .. } => "duration",
            Self::RatioStep { .. } => "ratio",
        }
    }

    pub fn step_ms(self) -> u32 {
        match self {
            Self::FixedDuration { step_ms, .. } | Self::RatioStep { step_ms, .. } => step_ms.max(1),
        }
    }

    pub fn frames(self, target: u64) -> CounterFrames {
        CounterFrames {
            strategy: self,
            target,
            current: 0.0,
            done: false,
        }
    }
}

/// Displayed values of one counter run, one per timer tick.
#[derive(Clone, Debug)]
pub struct CounterFrames {
    strategy: CounterStrategy,
    target: u64,
    current: f64,
    done: bool,
}

impl Iterator for CounterFrames {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }

        let target = self.target as f64;
        let shown = match self.strategy {
            CounterStrategy::FixedDuration {
                duration_ms,
                step_ms,
            } => {
                let steps = (f64::from(duration_ms) / f64::from(step_ms.max(1))).max(1.0);
                self.current += target / steps;
                if self.current >= target {
                    self.current = target;
                    self.done = true;
                }
                self.current.floor()
            }
            CounterStrategy::RatioStep { divisor, .. } => {
                if self.current < target {
                    let increment = target / f64::from(divisor.max(1));
                    self.current = (self.current + increment).ceil().min(target);
                } else {
                    self.current = target;
                }
                if self.current >= target {
                    self.done = true;
                }
                self.current
            }
        };

        // Snap the last frame so float drift never shows as target - 1.
        if self.done {
            return Some(self.target);
        }

        Some(shown as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(frames: &[u64], target: u64) {
        assert!(!frames.is_empty());
        assert!(frames.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(frames.iter().all(|value| *value <= target));
        assert_eq!(frames.last().copied(), Some(target));
    }

    #[test]
    fn parse_target_reads_leading_integer() {
        assert_eq!(parse_target("150"), Some(150));
        assert_eq!(parse_target("  98%"), Some(98));
        assert_eq!(parse_target("+12"), Some(12));
        assert_eq!(parse_target("1,200"), Some(1));
        assert_eq!(parse_target("-5"), None);
        assert_eq!(parse_target("n/a"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn fixed_duration_takes_duration_over_step_ticks() {
        let frames: Vec<u64> = CounterStrategy::default().frames(250).collect();

        assert_eq!(frames.len(), 125);
        assert_well_formed(&frames, 250);
        assert_eq!(frames[0], 2);
    }

    #[test]
    fn fixed_duration_snaps_awkward_targets() {
        for target in [1, 7, 99, 1_000, 123_457] {
            let frames: Vec<u64> = CounterStrategy::default().frames(target).collect();
            assert_well_formed(&frames, target);
            assert!(frames.len() <= 126);
        }
    }

    #[test]
    fn zero_target_shows_zero_once() {
        let frames: Vec<u64> = CounterStrategy::default().frames(0).collect();
        assert_eq!(frames, vec![0]);

        let frames: Vec<u64> = CounterStrategy::ratio().frames(0).collect();
        assert_eq!(frames, vec![0]);
    }

    #[test]
    fn ratio_step_never_overshoots() {
        // 300 / 200 = 1.5 per tick rounds up past the target without the cap.
        let frames: Vec<u64> = CounterStrategy::ratio().frames(300).collect();

        assert_well_formed(&frames, 300);
    }

    #[test]
    fn ratio_step_on_small_target_counts_by_one() {
        let frames: Vec<u64> = CounterStrategy::ratio().frames(5).collect();

        assert_eq!(frames, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn duration_off_the_step_grid_keeps_the_fraction() {
        // 3000 / 16 = 187.5 steps, so 375 climbs by exactly 2 per tick.
        let strategy = CounterStrategy::FixedDuration {
            duration_ms: 3_000,
            step_ms: 16,
        };
        let frames: Vec<u64> = strategy.frames(375).collect();

        assert_eq!(frames.len(), 188);
        assert_eq!(&frames[..3], &[2, 4, 6]);
        assert_well_formed(&frames, 375);
    }

    #[test]
    fn duration_shorter_than_step_finishes_in_one_tick() {
        let strategy = CounterStrategy::FixedDuration {
            duration_ms: 5,
            step_ms: 16,
        };

        assert_eq!(strategy.frames(40).collect::<Vec<_>>(), vec![40]);
    }

    #[test]
    fn strategy_names_round_trip_through_config_values() {
        assert_eq!(CounterStrategy::parse("Ratio"), Some(CounterStrategy::ratio()));
        assert_eq!(CounterStrategy::parse("duration"), Some(CounterStrategy::default()));
        assert_eq!(CounterStrategy::parse("linear"), None);
        assert_eq!(CounterStrategy::ratio().as_str(), "ratio");
        assert_eq!(CounterStrategy::ratio().step_ms(), 1);
    }
}
