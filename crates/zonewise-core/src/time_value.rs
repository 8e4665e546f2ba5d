use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ZoneWiseError;
use crate::types::{Money, Rate};
use crate::ZoneWiseResult;

/// Net Present Value of a series of annual cash flows (index 0 = today).
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ZoneWiseResult<Money> {
    if rate <= dec!(-1) {
        return Err(ZoneWiseError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Annualised rate that grows 1 into `multiple` over `years`.
///
/// This is the exact IRR of a single outflow followed by a single inflow.
/// A zero multiple is a total loss (-100%); `None` for a negative multiple
/// or a zero-length horizon.
pub fn annualized_return(multiple: Decimal, years: u32) -> Option<Rate> {
    if years == 0 || multiple < Decimal::ZERO {
        return None;
    }
    if multiple.is_zero() {
        return Some(dec!(-1));
    }
    let exponent = Decimal::ONE / Decimal::from(years);
    multiple
        .checked_powd(exponent)
        .map(|growth| growth - Decimal::ONE)
}
