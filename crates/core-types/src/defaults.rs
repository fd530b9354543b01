use crate::structs::{IndustryMultipleTable, ModelConfiguration};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// --- Default Implementations ---
// These mirror the evaluator's shipped defaults so the client has a usable
// configuration before the first load answers.

impl Default for ModelConfiguration {
    fn default() -> Self {
        Self {
            modeled_discount_rate: dec!(0.20),
            modeled_interest_rate: dec!(0.06),
            modeled_revenue_growth_aggressive: dec!(5.00),
            modeled_revenue_growth_standard: dec!(0.50),
            modeled_revenue_growth_low: dec!(0.10),
            modeled_valuation_threshold: dec!(0.25),
            modeled_cash_months: dec!(12.00),
        }
    }
}

const FALLBACK_MULTIPLES: [(&str, Option<Decimal>); 40] = [
    ("Biotechnology", Some(dec!(4.51))),
    ("Health Sustainability and Wellness", Some(dec!(2.555))),
    ("Foodtech", Some(dec!(2.765))),
    ("Medical Devices and Equipment", Some(dec!(3.38))),
    ("Energy", Some(dec!(3.51))),
    ("Software", Some(dec!(3.13))),
    ("Robotics", Some(dec!(2.78))),
    ("Education", Some(dec!(3.19))),
    ("Sports", Some(dec!(2.215))),
    ("Manufacturing", Some(dec!(2.43))),
    ("Clothing and Apparel", Some(dec!(1.805))),
    ("Apps", Some(dec!(2.855))),
    ("Artificial Intelligence", Some(dec!(3.38))),
    ("Climate Tech", Some(dec!(2.15))),
    ("Security", Some(dec!(4.02))),
    ("Restaurant Tech", Some(dec!(2.47))),
    ("Sustainability", Some(dec!(3.775))),
    ("Clean Technology", Some(dec!(2.62))),
    ("Ecommerce", Some(dec!(2.685))),
    ("Fintech", Some(dec!(3.365))),
    ("Healthcare Services", Some(dec!(2.495))),
    ("Business Services", Some(dec!(5.99))),
    ("Consumer Products", Some(dec!(2.335))),
    ("Beauty", Some(dec!(2.22))),
    ("Other", None),
    ("Consumer Services", Some(dec!(2.925))),
    ("Marketing / Advertising", Some(dec!(2.225))),
    ("Music and Audio", Some(dec!(1.775))),
    ("Wearables and Quantified Self", Some(dec!(3.635))),
    ("Internet / Web Services", Some(dec!(2.465))),
    ("HRtech", Some(dec!(4.61))),
    ("Construction", Some(dec!(4.86))),
    ("Food and Beverage", Some(dec!(2.5))),
    ("Mobility Tech", Some(dec!(2.46))),
    ("Esports", Some(dec!(1.92))),
    ("Commerce and Shopping", Some(dec!(2.185))),
    ("Digital Health", Some(dec!(2.76))),
    ("Ridesharing", Some(dec!(2.485))),
    ("Life Sciences", Some(dec!(3.975))),
    ("Privacy and Security", Some(dec!(4.47))),
];

/// The industry table used until the evaluator's own table has been loaded.
pub fn fallback_multiples() -> IndustryMultipleTable {
    FALLBACK_MULTIPLES
        .iter()
        .map(|(name, multiple)| (name.to_string(), *multiple))
        .collect()
}
