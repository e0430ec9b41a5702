//! Experience → level conversion.
//!
//! The level is always recomputed from total experience, never updated incrementally,
//! so it cannot drift from the stored total.

/// XP required to go from level 1 to level 2.
pub const BASE_XP_TO_NEXT: u64 = 100;

/// Result of converting a total experience value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next: u64,
}

/// Each tier needs 20% more XP than the previous one, rounded down.
pub fn next_requirement(xp_needed: u64) -> u64 {
    xp_needed + xp_needed / 5
}

/// Convert total accumulated experience into level, XP within the level, and XP to next.
pub fn level_for_experience(total_experience: u64) -> LevelProgress {
    let mut level = 1u32;
    let mut remaining = total_experience;
    let mut xp_needed = BASE_XP_TO_NEXT;

    while remaining >= xp_needed {
        remaining -= xp_needed;
        level += 1;
        xp_needed = next_requirement(xp_needed);
    }

    LevelProgress {
        level,
        current_xp: remaining,
        xp_to_next: xp_needed,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_experience_is_level_one() {
        let progress = level_for_experience(0);
        assert_eq!(
            progress,
            LevelProgress {
                level: 1,
                current_xp: 0,
                xp_to_next: 100
            }
        );
    }

    #[test]
    fn thresholds_grow_by_a_fifth() {
        // 100, 120, 144, 172 (172.8 rounded down), 206
        assert_eq!(level_for_experience(99).level, 1);
        assert_eq!(level_for_experience(100).level, 2);
        assert_eq!(level_for_experience(100).xp_to_next, 120);
        assert_eq!(level_for_experience(219).level, 2);
        assert_eq!(level_for_experience(220).level, 3);
        let at_four = level_for_experience(364);
        assert_eq!(at_four.level, 4);
        assert_eq!(at_four.current_xp, 0);
        assert_eq!(at_four.xp_to_next, 172);
        assert_eq!(level_for_experience(536).level, 5);
        assert_eq!(level_for_experience(536).xp_to_next, 206);
    }

    #[test]
    fn current_xp_stays_below_requirement() {
        for total in (0..20_000).step_by(37) {
            let p = level_for_experience(total);
            assert!(p.current_xp < p.xp_to_next, "total={total}");
            assert!(p.xp_to_next >= BASE_XP_TO_NEXT);
        }
    }

    #[test]
    fn level_is_monotonic_in_experience() {
        let mut last = 1;
        for total in 0..5_000u64 {
            let level = level_for_experience(total).level;
            assert!(level >= last);
            last = level;
        }
    }
}
