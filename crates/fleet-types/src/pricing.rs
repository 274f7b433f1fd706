//! Distance-based pricing.
//!
//! A rental is charged one currency unit per kilometre. Vehicles that a shop
//! had to pull from a lot are discounted by [`LOT_DISCOUNT_PERCENT`].

use rust_decimal::Decimal;

/// Discount applied when the rented vehicle came from a lot.
pub const LOT_DISCOUNT_PERCENT: u32 = 10;

/// Charge for a returned rental.
pub fn charge_for(distance: u64, discount: bool) -> Decimal {
    let gross = Decimal::from(distance);
    if discount {
        gross - discount_amount(gross)
    } else {
        gross
    }
}

/// The amount knocked off a rental's gross charge.
pub fn discount_for(distance: u64, discount: bool) -> Decimal {
    if discount {
        discount_amount(Decimal::from(distance))
    } else {
        Decimal::ZERO
    }
}

fn discount_amount(gross: Decimal) -> Decimal {
    gross * Decimal::from(LOT_DISCOUNT_PERCENT) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undiscounted_charge_is_distance() {
        assert_eq!(charge_for(100, false), Decimal::from(100));
        assert_eq!(charge_for(0, false), Decimal::ZERO);
    }

    #[test]
    fn discounted_charge_is_ninety_percent() {
        assert_eq!(charge_for(100, true), Decimal::from(90));
        assert_eq!(charge_for(15, true), Decimal::new(135, 1));
    }

    #[test]
    fn discount_plus_charge_is_gross() {
        for km in [0u64, 1, 7, 100, 12_345] {
            assert_eq!(charge_for(km, true) + discount_for(km, true), Decimal::from(km));
        }
        assert_eq!(discount_for(100, false), Decimal::ZERO);
    }

    #[test]
    fn charge_formats_with_two_places() {
        assert_eq!(format!("{:.2}", charge_for(100, true)), "90.00");
        assert_eq!(format!("{:.2}", charge_for(15, true)), "13.50");
    }
}
