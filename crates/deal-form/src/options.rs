use core_types::{IndustryMultipleTable, SecurityType, format_multiple};
use rust_decimal::Decimal;

/// One entry of the industry selector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryOption {
    pub name: String,
    /// `None` for industries without a multiple, such as "Other".
    pub multiple: Option<Decimal>,
}

impl IndustryOption {
    /// The multiple as shown next to the option; blank when there is none.
    pub fn multiple_label(&self) -> String {
        format_multiple(self.multiple)
    }
}

/// The industry choices, derived from the table every time they are asked for.
pub fn industry_options(multiples: &IndustryMultipleTable) -> Vec<IndustryOption> {
    multiples
        .iter()
        .map(|(name, multiple)| IndustryOption {
            name: name.to_string(),
            multiple,
        })
        .collect()
}

/// The fixed security-type choices.
pub fn security_type_options() -> &'static [SecurityType] {
    &SecurityType::ALL
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    #[test]
    fn options_follow_the_table_including_the_sentinel() {
        let mut table = IndustryMultipleTable::new();
        table.insert("Software", Some(dec!(3.13)));
        table.insert("Other", None);

        let options = industry_options(&table);
        let names: BTreeSet<_> = options.iter().map(|o| o.name.as_str()).collect();
        let keys: BTreeSet<_> = table.industries().collect();
        assert_eq!(names, keys);

        let other = options.iter().find(|o| o.name == "Other").expect("Other is selectable");
        assert_eq!(other.multiple, None);
        assert_eq!(other.multiple_label(), "");
    }

    #[test]
    fn security_types_are_fixed() {
        let labels: Vec<_> = security_type_options().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Convertible Note", "SAFE", "Preferred Equity", "Common Equity"]);
    }
}
