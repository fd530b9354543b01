use rust_decimal::Decimal;

/// Parses user-entered text as a decimal.
///
/// Surrounding whitespace is ignored and scientific notation (`1e5`) is accepted.
/// Returns `None` for blank text, for anything that is not a plain number
/// (`1_000`, `0x10`, `NaN`), and for values a decimal cannot hold exactly.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if !is_plain_number(text) {
        return None;
    }
    let text = text.strip_prefix('+').unwrap_or(text);
    match text.split_once(['e', 'E']) {
        Some((mantissa, _)) => {
            Decimal::from_str_exact(mantissa).ok()?;
            Decimal::from_scientific(text).ok()
        }
        None => Decimal::from_str_exact(text).ok(),
    }
}

/// Optional sign, digits with at most one `.`, then an optional exponent.
fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let mut digits = 0;
    let mut points = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    if digits == 0 || points > 1 {
        return false;
    }

    match exponent {
        None => true,
        Some(exponent) => {
            let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
        }
    }
}

/// True if every character could appear somewhere in a number a user is typing.
pub fn is_numeric_input(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E' | ' '))
}
