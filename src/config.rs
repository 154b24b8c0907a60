use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::PenaltyConfig;
use crate::types::TenorType;

/// longest accepted look-ahead for due soon lists
pub const MAX_DUE_SOON_WINDOW_DAYS: u32 = 366;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub tenors: TenorTable,
    pub penalty: PenaltyConfig,
    pub currency: CurrencyFormat,
    /// look-ahead used by dashboard "due soon" lists
    pub due_soon_window_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            tenors: TenorTable::default(),
            penalty: PenaltyConfig::default(),
            currency: CurrencyFormat::default(),
            due_soon_window_days: 7,
        }
    }
}

impl LedgerConfig {
    /// parse configuration from json, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.penalty.period_days == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "penalty period must be at least one day".to_string(),
            });
        }

        if self.penalty.weekly_rate.is_negative() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("negative penalty rate: {}", self.penalty.weekly_rate),
            });
        }

        if self.due_soon_window_days > MAX_DUE_SOON_WINDOW_DAYS {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "due soon window of {} days exceeds {}",
                    self.due_soon_window_days, MAX_DUE_SOON_WINDOW_DAYS
                ),
            });
        }

        for (tenor, terms) in self.tenors.options() {
            if terms.days == 0 || terms.interest_rate.is_negative() {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("invalid terms for tenor {}", tenor.label()),
                });
            }
        }

        Ok(())
    }
}

/// flat rate and term length of a tenor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenorTerms {
    pub interest_rate: Rate,
    pub days: u32,
}

impl TenorTerms {
    pub fn new(interest_rate: Rate, days: u32) -> Self {
        Self { interest_rate, days }
    }
}

/// lookup table for the fixed tenors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorTable {
    pub one_week: TenorTerms,
    pub two_weeks: TenorTerms,
    pub three_weeks: TenorTerms,
    pub four_weeks: TenorTerms,
}

impl Default for TenorTable {
    fn default() -> Self {
        Self {
            one_week: TenorTerms::new(Rate::from_percentage(15), 7),
            two_weeks: TenorTerms::new(Rate::from_percentage(20), 14),
            three_weeks: TenorTerms::new(Rate::from_percentage(25), 21),
            four_weeks: TenorTerms::new(Rate::from_percentage(30), 28),
        }
    }
}

impl TenorTable {
    /// terms for a fixed tenor, custom tenors have no table entry
    pub fn terms(&self, tenor: TenorType) -> Option<TenorTerms> {
        match tenor {
            TenorType::OneWeek => Some(self.one_week),
            TenorType::TwoWeeks => Some(self.two_weeks),
            TenorType::ThreeWeeks => Some(self.three_weeks),
            TenorType::FourWeeks => Some(self.four_weeks),
            TenorType::Custom => None,
        }
    }

    /// resolve rate and day count, `custom` is used only for custom tenors
    pub fn resolve(&self, tenor: TenorType, custom: Option<TenorTerms>) -> Option<TenorTerms> {
        if tenor.is_custom() {
            custom
        } else {
            self.terms(tenor)
        }
    }

    /// (tenor, terms) pairs in display order
    pub fn options(&self) -> Vec<(TenorType, TenorTerms)> {
        TenorType::FIXED
            .iter()
            .filter_map(|tenor| self.terms(*tenor).map(|terms| (*tenor, terms)))
            .collect()
    }
}

/// display formatting for amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub code: String,
    /// maximum fractional digits shown
    pub max_fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "ZMW".to_string(),
            max_fraction_digits: 3,
        }
    }
}

impl CurrencyFormat {
    /// format as `ZMW 1,150.5`: grouped thousands, trailing zeros trimmed
    pub fn format(&self, amount: Money) -> String {
        let value = amount.as_decimal().round_dp(self.max_fraction_digits).normalize();
        let negative = value < Decimal::ZERO;
        let text = value.abs().to_string();

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if negative { "-" } else { "" };
        match frac_part {
            Some(frac) => format!("{} {}{}.{}", self.code, sign, grouped, frac),
            None => format!("{} {}{}", self.code, sign, grouped),
        }
    }
}
