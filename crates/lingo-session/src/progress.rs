//! Reward accounting for committed exchanges.

/// How much one committed exchange is worth.
#[derive(Debug, Clone, Copy)]
pub struct RewardPolicy {
    /// Progress added per committed exchange, capped at 100.
    pub progress_increment: u8,
    /// Points awarded per committed exchange.
    pub points_per_turn: u32,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            progress_increment: 10,
            points_per_turn: 10,
        }
    }
}

impl RewardPolicy {
    /// Apply one committed exchange to the running totals.
    #[must_use]
    pub const fn advance(&self, progress_percent: u8, earned_points: u32) -> (u8, u32) {
        let progress = progress_percent.saturating_add(self.progress_increment);
        (
            if progress > 100 { 100 } else { progress },
            earned_points.saturating_add(self.points_per_turn),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let policy = RewardPolicy::default();
        assert_eq!(policy.advance(0, 0), (10, 10));
        assert_eq!(policy.advance(90, 120), (100, 130));
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        let policy = RewardPolicy {
            progress_increment: 30,
            points_per_turn: 5,
        };
        assert_eq!(policy.advance(95, 0).0, 100);
        assert_eq!(policy.advance(100, 0).0, 100);
    }
}
