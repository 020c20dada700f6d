//! Creature progression: XP rewards and evolution.
//!
//! A session finished naturally is worth [`FULL_SESSION_XP`]. A session
//! finished early earns the completed fraction of that, rounded up, and never
//! less than 1. Each level needs half again as much XP as the previous one.

use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// XP for a session that ran down to 0:00.
pub const FULL_SESSION_XP: u32 = 25;

/// XP needed to leave level 1.
pub const BASE_XP_NEEDED: u32 = 100;

/// Growth stage, a pure function of level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Egg,
    Baby,
    Teen,
    Adult,
}

impl Stage {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => Stage::Egg,
            2 => Stage::Baby,
            3 => Stage::Teen,
            _ => Stage::Adult,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Egg => "egg",
            Stage::Baby => "baby",
            Stage::Teen => "teen",
            Stage::Adult => "adult",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The creature the user raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureState {
    pub level: u32,
    pub xp: u32,
    pub xp_needed: u32,
    pub stage: Stage,
}

impl Default for CreatureState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_needed: BASE_XP_NEEDED,
            stage: Stage::Egg,
        }
    }
}

/// Outcome of [`CreatureState::apply_xp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionResult {
    pub evolved: bool,
    pub levels_gained: u32,
    pub level: u32,
    pub stage: Stage,
}

impl CreatureState {
    /// Add XP and level up as many times as it pays for.
    pub fn apply_xp(&mut self, xp_gained: u32) -> EvolutionResult {
        self.xp = self.xp.saturating_add(xp_gained);
        // A zero threshold would never be left behind.
        self.xp_needed = self.xp_needed.max(1);

        let mut levels_gained = 0;
        while self.xp >= self.xp_needed {
            self.level = self.level.saturating_add(1);
            self.xp -= self.xp_needed;
            self.xp_needed = next_threshold(self.xp_needed);
            levels_gained += 1;
        }
        self.stage = Stage::for_level(self.level);

        EvolutionResult {
            evolved: levels_gained > 0,
            levels_gained,
            level: self.level,
            stage: self.stage,
        }
    }
}

/// `floor(needed * 1.5)`, exact in integers.
fn next_threshold(needed: u32) -> u32 {
    let next = u64::from(needed) * 3 / 2;
    u32::try_from(next).unwrap_or(u32::MAX).max(1)
}

/// XP earned by the session described by `timer`.
///
/// `natural` means the countdown reached 0:00 on its own; otherwise the
/// reward is proportional to the elapsed share of `initial_total_seconds`.
pub fn calculate_xp(natural: bool, timer: &TimerState) -> u32 {
    if natural {
        return FULL_SESSION_XP;
    }
    let total = u64::from(timer.initial_total_seconds);
    if total == 0 {
        return 1;
    }
    let completed = u64::from(timer.elapsed_seconds()).min(total);
    // ceil(25 * completed / total)
    let partial = (u64::from(FULL_SESSION_XP) * completed).div_ceil(total);
    (partial as u32).clamp(1, FULL_SESSION_XP)
}
