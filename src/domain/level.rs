//! Per-level configuration, derived purely from the level number.

/// Highest reachable level; winning at this level keeps the colony here.
pub const MAX_LEVEL: u32 = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LevelConfig {
    pub level: u32,
    pub grid_size: usize,
    pub required_score: u32,
    pub max_turns: u32,
    pub survival_threshold: u8,
}

impl LevelConfig {
    /// Configuration for `level`, clamped to `1..=MAX_LEVEL`
    pub const fn for_level(level: u32) -> Self {
        let level = clamp_level(level);
        let step = level - 1;
        Self {
            level,
            grid_size: 6 + 2 * step as usize,
            required_score: 100 + 150 * step,
            max_turns: 35 + 5 * step,
            survival_threshold: if level <= 4 { 2 } else { 3 },
        }
    }

    /// Configuration a win at this level leads to
    pub const fn next(&self) -> Self {
        Self::for_level(self.level + 1)
    }
}

pub const fn clamp_level(level: u32) -> u32 {
    if level < 1 {
        1
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one() {
        let cfg = LevelConfig::for_level(1);
        assert_eq!(cfg.grid_size, 6);
        assert_eq!(cfg.max_turns, 35);
        assert_eq!(cfg.required_score, 100);
        assert_eq!(cfg.survival_threshold, 2);
    }

    #[test]
    fn test_grid_never_shrinks() {
        let sizes: Vec<_> = (1..=MAX_LEVEL).map(|l| LevelConfig::for_level(l).grid_size).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(LevelConfig::for_level(0).level, 1);
        assert_eq!(LevelConfig::for_level(99).level, MAX_LEVEL);
        assert_eq!(LevelConfig::for_level(MAX_LEVEL).next().level, MAX_LEVEL);
    }
}
