use configuration::CoercionPolicy;
use core_types::{ValidationError, parse_decimal};
use rust_decimal::Decimal;

/// Turns an edited value into a number according to `policy`.
///
/// `Lenient` stores zero for anything that does not parse, including blank
/// input. `Strict` rejects it.
pub fn coerce(policy: CoercionPolicy, field: &str, raw: &str) -> Result<Decimal, ValidationError> {
    match parse_decimal(raw) {
        Some(value) => Ok(value),
        None => match policy {
            CoercionPolicy::Lenient => {
                tracing::warn!(field, raw, "Unparseable number, storing 0.");
                Ok(Decimal::ZERO)
            }
            CoercionPolicy::Strict => Err(ValidationError::InvalidNumber {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lenient_collapses_garbage_to_zero() {
        assert_eq!(coerce(CoercionPolicy::Lenient, "x", "abc"), Ok(Decimal::ZERO));
        assert_eq!(coerce(CoercionPolicy::Lenient, "x", ""), Ok(Decimal::ZERO));
        assert_eq!(coerce(CoercionPolicy::Lenient, "x", "0.35"), Ok(dec!(0.35)));
    }

    #[test]
    fn strict_rejects_garbage() {
        assert_eq!(
            coerce(CoercionPolicy::Strict, "modeled_cash_months", "twelve"),
            Err(ValidationError::InvalidNumber {
                field: "modeled_cash_months".to_string(),
                value: "twelve".to_string(),
            })
        );
        assert_eq!(coerce(CoercionPolicy::Strict, "x", "12"), Ok(dec!(12)));
    }
}
