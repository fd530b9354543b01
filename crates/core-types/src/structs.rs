use crate::enums::{ConfigField, DealField, SecurityType};
use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A deal exactly as the user typed it. Every field stays raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealDraft {
    pub company_name: String,
    pub industry: String,
    pub ask: String,
    pub valuation_cap: String,
    pub security_type: String,
    pub discount_rate: String,
    pub interest: String,
    pub yearly_revenue: String,
    pub monthly_burn: String,
    pub current_cash: String,
    pub previous_raise: String,
}

impl DealDraft {
    pub fn get(&self, field: DealField) -> &str {
        match field {
            DealField::CompanyName => &self.company_name,
            DealField::Industry => &self.industry,
            DealField::Ask => &self.ask,
            DealField::ValuationCap => &self.valuation_cap,
            DealField::SecurityType => &self.security_type,
            DealField::DiscountRate => &self.discount_rate,
            DealField::Interest => &self.interest,
            DealField::YearlyRevenue => &self.yearly_revenue,
            DealField::MonthlyBurn => &self.monthly_burn,
            DealField::CurrentCash => &self.current_cash,
            DealField::PreviousRaise => &self.previous_raise,
        }
    }

    /// Replaces exactly one field.
    pub fn set(&mut self, field: DealField, value: impl Into<String>) {
        let slot = match field {
            DealField::CompanyName => &mut self.company_name,
            DealField::Industry => &mut self.industry,
            DealField::Ask => &mut self.ask,
            DealField::ValuationCap => &mut self.valuation_cap,
            DealField::SecurityType => &mut self.security_type,
            DealField::DiscountRate => &mut self.discount_rate,
            DealField::Interest => &mut self.interest,
            DealField::YearlyRevenue => &mut self.yearly_revenue,
            DealField::MonthlyBurn => &mut self.monthly_burn,
            DealField::CurrentCash => &mut self.current_cash,
            DealField::PreviousRaise => &mut self.previous_raise,
        };
        *slot = value.into();
    }
}

/// The typed payload for `POST /evaluate-deal`.
///
/// Percentages stay on the 0-100 scale; the evaluator normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRequest {
    pub company_name: String,
    pub industry: String,
    pub ask: Decimal,
    pub valuation_cap: Decimal,
    pub security_type: SecurityType,
    pub discount_rate: Decimal,
    pub interest: Decimal,
    pub yearly_revenue: Vec<Decimal>,
    pub monthly_burn: Decimal,
    pub current_cash: Decimal,
    pub previous_raise: Decimal,
}

/// Whatever the evaluator returned. Stored and rendered verbatim, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealResult(pub Value);

impl DealResult {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// The modeled assumptions the evaluator scores deals against.
///
/// Every key is required when deserializing; a document missing one is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfiguration {
    pub modeled_discount_rate: Decimal,
    pub modeled_interest_rate: Decimal,
    pub modeled_revenue_growth_aggressive: Decimal,
    pub modeled_revenue_growth_standard: Decimal,
    pub modeled_revenue_growth_low: Decimal,
    pub modeled_valuation_threshold: Decimal,
    pub modeled_cash_months: Decimal,
}

impl ModelConfiguration {
    pub fn get(&self, field: ConfigField) -> Decimal {
        match field {
            ConfigField::DiscountRate => self.modeled_discount_rate,
            ConfigField::InterestRate => self.modeled_interest_rate,
            ConfigField::RevenueGrowthAggressive => self.modeled_revenue_growth_aggressive,
            ConfigField::RevenueGrowthStandard => self.modeled_revenue_growth_standard,
            ConfigField::RevenueGrowthLow => self.modeled_revenue_growth_low,
            ConfigField::ValuationThreshold => self.modeled_valuation_threshold,
            ConfigField::CashMonths => self.modeled_cash_months,
        }
    }

    pub fn set(&mut self, field: ConfigField, value: Decimal) {
        let slot = match field {
            ConfigField::DiscountRate => &mut self.modeled_discount_rate,
            ConfigField::InterestRate => &mut self.modeled_interest_rate,
            ConfigField::RevenueGrowthAggressive => &mut self.modeled_revenue_growth_aggressive,
            ConfigField::RevenueGrowthStandard => &mut self.modeled_revenue_growth_standard,
            ConfigField::RevenueGrowthLow => &mut self.modeled_revenue_growth_low,
            ConfigField::ValuationThreshold => &mut self.modeled_valuation_threshold,
            ConfigField::CashMonths => &mut self.modeled_cash_months,
        };
        *slot = value;
    }

    /// `(field, value)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (ConfigField, Decimal)> + '_ {
        ConfigField::ALL.into_iter().map(|field| (field, self.get(field)))
    }
}

/// Industry name to valuation multiple.
///
/// `None` is the "no multiple" sentinel (sent as JSON `null`); it is not zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryMultipleTable(BTreeMap<String, Option<Decimal>>);

impl IndustryMultipleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, industry: &str) -> bool {
        self.0.contains_key(industry)
    }

    /// `None` if the industry is unknown, `Some(None)` for the sentinel.
    pub fn multiple(&self, industry: &str) -> Option<Option<Decimal>> {
        self.0.get(industry).copied()
    }

    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Decimal>)> {
        self.0.iter().map(|(name, multiple)| (name.as_str(), *multiple))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts or replaces an entry. Used when building a table.
    pub fn insert(&mut self, industry: impl Into<String>, multiple: Option<Decimal>) {
        self.0.insert(industry.into(), multiple);
    }

    /// Replaces the multiple of an industry already in the table.
    pub fn update(
        &mut self,
        industry: &str,
        multiple: Option<Decimal>,
    ) -> Result<(), ValidationError> {
        match self.0.get_mut(industry) {
            Some(slot) => {
                *slot = multiple;
                Ok(())
            }
            None => Err(ValidationError::UnknownIndustry(industry.to_string())),
        }
    }
}

impl FromIterator<(String, Option<Decimal>)> for IndustryMultipleTable {
    fn from_iter<I: IntoIterator<Item = (String, Option<Decimal>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders a multiple for an input box: blank for the sentinel, never "0".
pub fn format_multiple(multiple: Option<Decimal>) -> String {
    multiple.map(|m| m.normalize().to_string()).unwrap_or_default()
}
