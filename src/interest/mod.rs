pub mod penalty;

use crate::decimal::{Money, Rate};

pub use penalty::{PenaltyCalculation, PenaltyConfig, PenaltyEngine};

/// flat interest charged once over the full tenor, never compounded
pub fn simple_interest(principal: Money, rate: Rate) -> Money {
    principal.apply_rate(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simple_interest() {
        let principal = Money::from_major(1_000);

        assert_eq!(simple_interest(principal, Rate::from_percentage(15)), Money::from_major(150));
        assert_eq!(simple_interest(principal, Rate::from_percentage(30)), Money::from_major(300));
        assert_eq!(simple_interest(principal, Rate::ZERO), Money::ZERO);
    }

    #[test]
    fn test_fractional_rate() {
        let principal = Money::from_major(750);
        let rate = Rate::from_percentage_decimal(dec!(12.5));

        assert_eq!(simple_interest(principal, rate), Money::from_str_exact("93.75").unwrap());
    }
}
