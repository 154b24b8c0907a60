use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// overdue penalty configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// rate charged on principal per full period late
    pub weekly_rate: Rate,
    /// length of a penalty period in days
    pub period_days: u32,
}

impl PenaltyConfig {
    pub fn new(weekly_rate: Rate) -> Self {
        Self {
            weekly_rate,
            period_days: 7,
        }
    }
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self::new(Rate::from_percentage(5))
    }
}

/// engine for calculating overdue penalties
///
/// Penalties accrue in whole periods only: a loan 13 days late with a
/// 7-day period is charged for one period.
#[derive(Debug, Clone)]
pub struct PenaltyEngine {
    pub config: PenaltyConfig,
}

impl PenaltyEngine {
    pub fn new(config: PenaltyConfig) -> Self {
        Self { config }
    }

    /// penalty on `principal` for a loan due at `due_date`, as of `now`
    pub fn calculate_penalty(
        &self,
        principal: Money,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> PenaltyCalculation {
        if now <= due_date {
            return self.penalty_for_days(principal, 0);
        }

        // num_days truncates, which floors for positive spans
        let days_overdue = (now - due_date).num_days().max(0);
        let days_overdue = u32::try_from(days_overdue).unwrap_or(u32::MAX);

        self.penalty_for_days(principal, days_overdue)
    }

    /// penalty on `principal` for a whole number of days late
    pub fn penalty_for_days(&self, principal: Money, days_overdue: u32) -> PenaltyCalculation {
        let periods_charged = if self.config.period_days == 0 {
            0
        } else {
            days_overdue / self.config.period_days
        };

        let penalty_amount = if periods_charged == 0 {
            Money::ZERO
        } else {
            principal.apply_rate(self.config.weekly_rate) * Decimal::from(periods_charged)
        };

        PenaltyCalculation {
            penalty_amount,
            rate: self.config.weekly_rate,
            days_overdue,
            periods_charged,
            principal_base: principal,
        }
    }
}

impl Default for PenaltyEngine {
    fn default() -> Self {
        Self::new(PenaltyConfig::default())
    }
}

/// penalty calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyCalculation {
    pub penalty_amount: Money,
    pub rate: Rate,
    pub days_overdue: u32,
    pub periods_charged: u32,
    pub principal_base: Money,
}
