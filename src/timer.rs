use tracing::debug;

use crate::game::GameType;

pub const DEFAULT_CHALLENGE_TIME: f32 = 60.0;
pub const MIN_CHALLENGE_TIME: f32 = 10.0;
pub const MAX_CHALLENGE_TIME: f32 = 600.0;
pub const CHALLENGE_TIME_STEP: f32 = 10.0;

/// Counts up in freeplay and down from the max challenge time in challenge
/// mode.
#[derive(Debug, Clone)]
pub struct Timer {
    value: f32,
    counting: bool,
    max_challenge_time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_CHALLENGE_TIME)
    }
}

impl Timer {
    pub fn new(max_challenge_time: f32) -> Self {
        Self {
            value: 0.0,
            counting: false,
            max_challenge_time: max_challenge_time.clamp(MIN_CHALLENGE_TIME, MAX_CHALLENGE_TIME),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    pub fn max_challenge_time(&self) -> f32 {
        self.max_challenge_time
    }

    /// Resumes counting from the current value.
    pub fn start(&mut self) {
        self.counting = true;
    }

    pub fn reset(&mut self, game_type: GameType) {
        self.counting = false;
        self.value = match game_type {
            GameType::Freeplay => 0.0,
            GameType::Challenge => self.max_challenge_time,
        };
        debug!(?game_type, value = self.value, "timer reset");
    }

    /// The value may drop below zero in challenge mode; expiry is `value < 1`.
    pub fn tick(&mut self, delta_seconds: f32, game_type: GameType) {
        if !self.counting {
            return;
        }
        match game_type {
            GameType::Freeplay => self.value += delta_seconds,
            GameType::Challenge => self.value -= delta_seconds,
        }
    }

    /// Whether a challenge countdown has run out. Checked once per frame, so
    /// anything under a second counts as expired.
    pub fn is_expired(&self) -> bool {
        self.value < 1.0
    }

    pub fn change_max_challenge_time(&mut self, increase: bool) {
        let step = if increase {
            CHALLENGE_TIME_STEP
        } else {
            -CHALLENGE_TIME_STEP
        };
        self.max_challenge_time =
            (self.max_challenge_time + step).clamp(MIN_CHALLENGE_TIME, MAX_CHALLENGE_TIME);
        debug!(max = self.max_challenge_time, "max challenge time changed");
    }

    /// Formats the timer as `MM:SS`.
    ///
    /// With `as_elapsed` the time spent on a challenge is reported instead,
    /// which is `max - value + 1` since expiry fires below one second.
    pub fn format_time(&self, as_elapsed: bool) -> String {
        let seconds = if as_elapsed {
            self.max_challenge_time - self.value + 1.0
        } else {
            self.value
        };
        format_seconds(seconds)
    }
}

/// Whole seconds as `MM:SS`; fractions are truncated and negatives read `00:00`.
pub fn format_seconds(seconds: f32) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
