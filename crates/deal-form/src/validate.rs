use core_types::{
    DealDraft, DealField, DealRequest, IndustryMultipleTable, SecurityType, ValidationError,
    parse_decimal,
};
use rust_decimal::Decimal;

/// Splits the revenue history on commas and parses every entry.
///
/// One bad entry rejects the whole list.
pub fn parse_revenue(raw: &str) -> Result<Vec<Decimal>, ValidationError> {
    raw.split(',')
        .enumerate()
        .map(|(index, token)| {
            parse_decimal(token).ok_or_else(|| ValidationError::MalformedRevenue {
                token: token.trim().to_string(),
                position: index + 1,
            })
        })
        .collect()
}

/// Turns a draft into the request the evaluator expects.
///
/// The revenue list is checked first, then the remaining fields in form order.
/// Industries are checked against `multiples` as it is now.
pub fn build_request(
    draft: &DealDraft,
    multiples: &IndustryMultipleTable,
) -> Result<DealRequest, ValidationError> {
    let yearly_revenue = parse_revenue(draft.get(DealField::YearlyRevenue))?;

    let company_name = required_text(draft, DealField::CompanyName)?;

    let industry = required_text(draft, DealField::Industry)?;
    if !multiples.contains(&industry) {
        return Err(ValidationError::UnknownIndustry(industry));
    }

    let ask = required_number(draft, DealField::Ask)?;
    ensure(ask > Decimal::ZERO, DealField::Ask, "must be greater than 0", ask)?;

    let valuation_cap = non_negative(draft, DealField::ValuationCap)?;
    let security_type: SecurityType = required_text(draft, DealField::SecurityType)?.parse()?;
    let discount_rate = percentage(draft, DealField::DiscountRate)?;
    let interest = percentage(draft, DealField::Interest)?;
    let monthly_burn = non_negative(draft, DealField::MonthlyBurn)?;
    let current_cash = non_negative(draft, DealField::CurrentCash)?;

    // Optional: blank or unparseable counts as zero.
    let previous_raise =
        parse_decimal(draft.get(DealField::PreviousRaise)).unwrap_or(Decimal::ZERO);
    ensure(
        previous_raise >= Decimal::ZERO,
        DealField::PreviousRaise,
        "must not be negative",
        previous_raise,
    )?;

    Ok(DealRequest {
        company_name,
        industry,
        ask,
        valuation_cap,
        security_type,
        discount_rate,
        interest,
        yearly_revenue,
        monthly_burn,
        current_cash,
        previous_raise,
    })
}

fn required_text(draft: &DealDraft, field: DealField) -> Result<String, ValidationError> {
    let value = draft.get(field).trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field.label()));
    }
    Ok(value.to_string())
}

fn required_number(draft: &DealDraft, field: DealField) -> Result<Decimal, ValidationError> {
    let raw = required_text(draft, field)?;
    parse_decimal(&raw).ok_or_else(|| ValidationError::InvalidNumber {
        field: field.label(),
        value: raw,
    })
}

fn non_negative(draft: &DealDraft, field: DealField) -> Result<Decimal, ValidationError> {
    let value = required_number(draft, field)?;
    ensure(value >= Decimal::ZERO, field, "must not be negative", value)?;
    Ok(value)
}

fn percentage(draft: &DealDraft, field: DealField) -> Result<Decimal, ValidationError> {
    let value = required_number(draft, field)?;
    ensure(
        (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&value),
        field,
        "must be a percentage between 0 and 100",
        value,
    )?;
    Ok(value)
}

fn ensure(
    holds: bool,
    field: DealField,
    constraint: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if holds {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.label(),
            constraint,
            value: value.to_string(),
        })
    }
}
