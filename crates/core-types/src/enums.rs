use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The instrument a deal is offered through. The wire form is the human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "Convertible Note")]
    ConvertibleNote,
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "Preferred Equity")]
    PreferredEquity,
    #[serde(rename = "Common Equity")]
    CommonEquity,
}

impl SecurityType {
    /// Every selectable security type, in the order the selector lists them.
    pub const ALL: [SecurityType; 4] = [
        SecurityType::ConvertibleNote,
        SecurityType::Safe,
        SecurityType::PreferredEquity,
        SecurityType::CommonEquity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SecurityType::ConvertibleNote => "Convertible Note",
            SecurityType::Safe => "SAFE",
            SecurityType::PreferredEquity => "Preferred Equity",
            SecurityType::CommonEquity => "Common Equity",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SecurityType {
    type Err = ValidationError;

    /// Matches a label case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SecurityType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownSecurityType(wanted.to_string()))
    }
}

/// How a draft field is entered, which decides the input shaping applied per keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, taken as typed.
    Text,
    /// A single number.
    Numeric,
    /// One of a list of options.
    Choice,
    /// Comma-separated numbers, only checked at submit.
    NumberList,
}

/// The named fields of a deal draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealField {
    CompanyName,
    Industry,
    Ask,
    ValuationCap,
    SecurityType,
    DiscountRate,
    Interest,
    YearlyRevenue,
    MonthlyBurn,
    CurrentCash,
    PreviousRaise,
}

impl DealField {
    /// Form order.
    pub const ALL: [DealField; 11] = [
        DealField::CompanyName,
        DealField::Industry,
        DealField::Ask,
        DealField::ValuationCap,
        DealField::SecurityType,
        DealField::DiscountRate,
        DealField::Interest,
        DealField::YearlyRevenue,
        DealField::MonthlyBurn,
        DealField::CurrentCash,
        DealField::PreviousRaise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealField::CompanyName => "company_name",
            DealField::Industry => "industry",
            DealField::Ask => "ask",
            DealField::ValuationCap => "valuation_cap",
            DealField::SecurityType => "security_type",
            DealField::DiscountRate => "discount_rate",
            DealField::Interest => "interest",
            DealField::YearlyRevenue => "yearly_revenue",
            DealField::MonthlyBurn => "monthly_burn",
            DealField::CurrentCash => "current_cash",
            DealField::PreviousRaise => "previous_raise",
        }
    }

    /// The label shown next to the input, e.g. "yearly revenue".
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            DealField::CompanyName => FieldKind::Text,
            DealField::Industry | DealField::SecurityType => FieldKind::Choice,
            DealField::YearlyRevenue => FieldKind::NumberList,
            _ => FieldKind::Numeric,
        }
    }

    /// Only the previous raise may be left blank.
    pub fn is_required(&self) -> bool {
        !matches!(self, DealField::PreviousRaise)
    }
}

impl fmt::Display for DealField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// The fixed set of modeled assumptions held in the model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    DiscountRate,
    InterestRate,
    RevenueGrowthAggressive,
    RevenueGrowthStandard,
    RevenueGrowthLow,
    ValuationThreshold,
    CashMonths,
}

impl ConfigField {
    pub const ALL: [ConfigField; 7] = [
        ConfigField::DiscountRate,
        ConfigField::InterestRate,
        ConfigField::RevenueGrowthAggressive,
        ConfigField::RevenueGrowthStandard,
        ConfigField::RevenueGrowthLow,
        ConfigField::ValuationThreshold,
        ConfigField::CashMonths,
    ];

    /// The key used in the configuration document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::DiscountRate => "modeled_discount_rate",
            ConfigField::InterestRate => "modeled_interest_rate",
            ConfigField::RevenueGrowthAggressive => "modeled_revenue_growth_aggressive",
            ConfigField::RevenueGrowthStandard => "modeled_revenue_growth_standard",
            ConfigField::RevenueGrowthLow => "modeled_revenue_growth_low",
            ConfigField::ValuationThreshold => "modeled_valuation_threshold",
            ConfigField::CashMonths => "modeled_cash_months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::DiscountRate => "Modeled Discount Rate",
            ConfigField::InterestRate => "Modeled Interest Rate",
            ConfigField::RevenueGrowthAggressive => "Modeled Revenue Growth Aggressive",
            ConfigField::RevenueGrowthStandard => "Modeled Revenue Growth Standard",
            ConfigField::RevenueGrowthLow => "Modeled Revenue Growth Low",
            ConfigField::ValuationThreshold => "Modeled Valuation Threshold",
            ConfigField::CashMonths => "Modeled Cash Months",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}
