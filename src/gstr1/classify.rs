//! Sorting a period's invoices into GSTR-1 sections

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::BillingConfig;
use crate::tax::round_money;
use crate::types::{Invoice, TaxComponents};

/// Invoices of one filing period split by section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Classification {
    /// Registered buyers (invoice carries a GSTIN)
    pub b2b: Vec<Invoice>,
    /// Unregistered buyers, reported in aggregate
    pub b2cs: Vec<Invoice>,
    /// Unregistered inter-state invoices above the B2CL threshold
    pub b2cl: Vec<Invoice>,
}

/// Direction of a supply relative to the company's registration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupplyType {
    Intra,
    Inter,
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::Intra => f.write_str("INTRA"),
            SupplyType::Inter => f.write_str("INTER"),
        }
    }
}

fn has_gstin(gstin: Option<&str>) -> bool {
    gstin.is_some_and(|gstin| !gstin.trim().is_empty())
}

/// An invoice is inter-state only when it names a place of supply outside the
/// company's state
fn names_other_state(invoice: &Invoice, company_state_code: &str) -> bool {
    invoice
        .place_of_supply_state_code
        .as_deref()
        .map(str::trim)
        .is_some_and(|pos| !pos.is_empty() && pos != company_state_code)
}

/// Split invoices into B2B, B2CS and B2CL, keeping input order within each
pub fn classify(
    invoices: &[Invoice],
    company_state_code: &str,
    config: &BillingConfig,
) -> Gstr1Classification {
    let mut classification = Gstr1Classification::default();

    for invoice in invoices {
        if has_gstin(invoice.party_gstin.as_deref()) {
            classification.b2b.push(invoice.clone());
        } else if names_other_state(invoice, company_state_code)
            && invoice.grand_total > config.b2cl_threshold
        {
            classification.b2cl.push(invoice.clone());
        } else {
            classification.b2cs.push(invoice.clone());
        }
    }

    debug!(
        b2b = classification.b2b.len(),
        b2cs = classification.b2cs.len(),
        b2cl = classification.b2cl.len(),
        "classified invoices"
    );
    classification
}

/// Rate reported for a document: twice the CGST rate, else the IGST rate, else
/// the configured fallback
pub fn effective_rate(tax: &TaxComponents, fallback: &BigDecimal) -> BigDecimal {
    if let Some(cgst_rate) = tax.cgst_rate().filter(|rate| !rate.is_zero()) {
        return (cgst_rate * BigDecimal::from(2)).normalized();
    }
    if let Some(igst_rate) = tax.igst_rate().filter(|rate| !rate.is_zero()) {
        return igst_rate.normalized();
    }
    fallback.clone()
}

/// Place of supply code for a document, defaulting to the company's state
pub fn place_of_supply<'a>(state_code: Option<&'a str>, company_state_code: &'a str) -> &'a str {
    state_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(company_state_code)
}

/// One B2CS line: unregistered sales summed per place of supply, rate and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2csAggregate {
    pub place_of_supply: String,
    pub rate: BigDecimal,
    pub supply_type: SupplyType,
    pub taxable_value: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
}

/// Aggregate B2CS invoices by `(place of supply, effective rate, direction)` in
/// first-seen order, with rounded sums
pub fn aggregate_b2cs(
    invoices: &[Invoice],
    company_state_code: &str,
    config: &BillingConfig,
) -> Vec<B2csAggregate> {
    let mut aggregates: Vec<B2csAggregate> = Vec::new();

    for invoice in invoices {
        let pos = place_of_supply(
            invoice.place_of_supply_state_code.as_deref(),
            company_state_code,
        );
        let supply_type = if pos == company_state_code {
            SupplyType::Intra
        } else {
            SupplyType::Inter
        };
        let rate = effective_rate(&invoice.tax, &config.fallback_gst_rate);

        let existing = aggregates.iter().position(|aggregate| {
            aggregate.place_of_supply == pos
                && aggregate.rate == rate
                && aggregate.supply_type == supply_type
        });
        let aggregate = match existing {
            Some(position) => &mut aggregates[position],
            None => {
                aggregates.push(B2csAggregate {
                    place_of_supply: pos.to_string(),
                    rate,
                    supply_type,
                    taxable_value: BigDecimal::zero(),
                    cgst_amount: BigDecimal::zero(),
                    sgst_amount: BigDecimal::zero(),
                    igst_amount: BigDecimal::zero(),
                });
                let last = aggregates.len() - 1;
                &mut aggregates[last]
            }
        };

        aggregate.taxable_value += &invoice.sub_total;
        aggregate.cgst_amount += invoice.tax.cgst_amount();
        aggregate.sgst_amount += invoice.tax.sgst_amount();
        aggregate.igst_amount += invoice.tax.igst_amount();
    }

    for aggregate in &mut aggregates {
        aggregate.taxable_value = round_money(&aggregate.taxable_value);
        aggregate.cgst_amount = round_money(&aggregate.cgst_amount);
        aggregate.sgst_amount = round_money(&aggregate.sgst_amount);
        aggregate.igst_amount = round_money(&aggregate.igst_amount);
    }

    aggregates
}

/// Group items by key, groups and members in first-seen order
pub fn group_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let item_key = key(&item);
        match groups.iter().position(|(group_key, _)| *group_key == item_key) {
            Some(position) => groups[position].1.push(item),
            None => groups.push((item_key, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dec, taxed_invoice};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 12).unwrap()
    }

    #[test]
    fn test_registered_buyer_always_b2b() {
        let mut large = taxed_invoice(1, date(), "500000", "18", "07", "27");
        large.party_gstin = Some("27AAACA1234B1Z5".to_string());

        let result = classify(&[large], "07", &BillingConfig::default());
        assert_eq!(result.b2b.len(), 1);
        assert!(result.b2cs.is_empty());
        assert!(result.b2cl.is_empty());
    }

    #[test]
    fn test_small_intra_state_is_b2cs() {
        let mut inv = taxed_invoice(1, date(), "84745.76", "18", "07", "07");
        inv.grand_total = dec("100000");

        let result = classify(&[inv], "07", &BillingConfig::default());
        assert_eq!(result.b2cs.len(), 1);
    }

    #[test]
    fn test_large_inter_state_is_b2cl() {
        let mut inv = taxed_invoice(1, date(), "254237.29", "18", "07", "27");
        inv.grand_total = dec("300000");

        let result = classify(&[inv], "07", &BillingConfig::default());
        assert_eq!(result.b2cl.len(), 1);
    }

    #[test]
    fn test_threshold_is_exclusive_and_configurable() {
        let mut at_threshold = taxed_invoice(1, date(), "200000", "18", "07", "27");
        at_threshold.grand_total = dec("250000");

        let result = classify(&[at_threshold.clone()], "07", &BillingConfig::default());
        assert_eq!(result.b2cs.len(), 1);

        let lowered = BillingConfig::default().with_b2cl_threshold("100000").unwrap();
        let result = classify(&[at_threshold], "07", &lowered);
        assert_eq!(result.b2cl.len(), 1);
    }

    #[test]
    fn test_large_sale_without_place_of_supply_is_b2cs() {
        let mut inv = taxed_invoice(1, date(), "400000", "18", "07", "27");
        inv.place_of_supply_state_code = None;

        let result = classify(&[inv], "07", &BillingConfig::default());
        assert_eq!(result.b2cs.len(), 1);
    }

    #[test]
    fn test_effective_rate() {
        let intra = taxed_invoice(1, date(), "100", "12", "07", "07");
        let inter = taxed_invoice(2, date(), "100", "28", "07", "27");
        let fallback = dec("18");
        assert_eq!(effective_rate(&intra.tax, &fallback), dec("12"));
        assert_eq!(effective_rate(&inter.tax, &fallback), dec("28"));
        assert_eq!(effective_rate(&TaxComponents::Nil, &fallback), dec("18"));
    }

    #[test]
    fn test_b2cs_aggregation_keys() {
        let invoices = vec![
            taxed_invoice(1, date(), "1000", "18", "07", "07"),
            taxed_invoice(2, date(), "500.50", "18", "07", "07"),
            taxed_invoice(3, date(), "200", "12", "07", "07"),
            taxed_invoice(4, date(), "300", "18", "07", "09"),
        ];

        let aggregates = aggregate_b2cs(&invoices, "07", &BillingConfig::default());
        assert_eq!(aggregates.len(), 3);

        let first = &aggregates[0];
        assert_eq!(first.place_of_supply, "07");
        assert_eq!(first.rate, dec("18"));
        assert_eq!(first.supply_type, SupplyType::Intra);
        assert_eq!(first.taxable_value, dec("1500.50"));
        assert_eq!(first.cgst_amount, dec("135.05"));
        assert_eq!(first.igst_amount, dec("0"));

        let inter = &aggregates[2];
        assert_eq!(inter.supply_type, SupplyType::Inter);
        assert_eq!(inter.igst_amount, dec("54.00"));
    }

    #[test]
    fn test_group_by_key_keeps_first_seen_order() {
        let groups = group_by_key(vec!["b1", "a1", "b2"], |s| s.chars().next());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Some('b'));
        assert_eq!(groups[0].1, vec!["b1", "b2"]);
    }
}
