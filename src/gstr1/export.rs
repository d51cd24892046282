//! Flat CSV rows for spreadsheet review of a return

use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use crate::gstr1::Gstr1Report;
use crate::tax::round_money;
use crate::types::{BillingError, BillingResult, CreditNote, Invoice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    #[serde(rename = "Section")]
    pub section: &'static str,
    #[serde(rename = "Document No")]
    pub document_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "GSTIN")]
    pub gstin: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Place of Supply")]
    pub place_of_supply: String,
    #[serde(rename = "Taxable Value")]
    pub taxable_value: String,
    #[serde(rename = "CGST")]
    pub cgst: String,
    #[serde(rename = "SGST")]
    pub sgst: String,
    #[serde(rename = "IGST")]
    pub igst: String,
    #[serde(rename = "Total")]
    pub total: String,
}

/// Two decimal places, zero included (`with_scale` alone renders zero as `0`)
fn money(value: &BigDecimal) -> String {
    let rounded = round_money(value);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    rounded.with_scale(2).to_string()
}

fn invoice_row(section: &'static str, invoice: &Invoice) -> CsvRow {
    let place_of_supply = invoice
        .place_of_supply
        .clone()
        .or_else(|| invoice.place_of_supply_state_code.clone())
        .unwrap_or_default();

    CsvRow {
        section,
        document_number: invoice.reference(),
        date: invoice.invoice_date.to_string(),
        gstin: invoice.party_gstin.clone().unwrap_or_default(),
        name: invoice.billed_to.name.clone(),
        place_of_supply,
        taxable_value: money(&invoice.sub_total),
        cgst: money(&invoice.tax.cgst_amount()),
        sgst: money(&invoice.tax.sgst_amount()),
        igst: money(&invoice.tax.igst_amount()),
        total: money(&invoice.grand_total),
    }
}

fn credit_note_row(note: &CreditNote) -> CsvRow {
    CsvRow {
        section: "CDN",
        document_number: note.reference(),
        date: note.credit_note_date.to_string(),
        gstin: note.party_gstin.clone().unwrap_or_default(),
        name: note.party.name.clone(),
        place_of_supply: note
            .party
            .state
            .clone()
            .or_else(|| note.party.state_code.clone())
            .unwrap_or_default(),
        taxable_value: money(&note.amount_before_tax),
        cgst: money(&note.tax.cgst_amount()),
        sgst: money(&note.tax.sgst_amount()),
        igst: money(&note.tax.igst_amount()),
        total: money(&note.total_amount),
    }
}

/// Rows for every document in the return: B2B, B2CL, B2CS, then credit notes
pub fn csv_rows(report: &Gstr1Report) -> Vec<CsvRow> {
    let classification = &report.classification;
    classification
        .b2b
        .iter()
        .map(|inv| invoice_row("B2B", inv))
        .chain(classification.b2cl.iter().map(|inv| invoice_row("B2CL", inv)))
        .chain(classification.b2cs.iter().map(|inv| invoice_row("B2CS", inv)))
        .chain(report.credit_notes.iter().map(credit_note_row))
        .collect()
}

pub const CSV_HEADER: [&str; 11] = [
    "Section",
    "Document No",
    "Date",
    "GSTIN",
    "Name",
    "Place of Supply",
    "Taxable Value",
    "CGST",
    "SGST",
    "IGST",
    "Total",
];

/// Render rows as CSV; the header line is written even when there are no rows
pub fn write_csv(rows: &[CsvRow]) -> BillingResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| BillingError::Export(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| BillingError::Export(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| BillingError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BillingError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_money_keeps_two_places_for_zero() {
        assert_eq!(money(&BigDecimal::zero()), "0.00");
        assert_eq!(money(&dec("0.00")), "0.00");
        assert_eq!(money(&dec("0.001")), "0.00");
        assert_eq!(money(&dec("-0.004")), "0.00");
    }

    #[test]
    fn test_money_rounds_to_paise() {
        assert_eq!(money(&dec("90")), "90.00");
        assert_eq!(money(&dec("1180.005")), "1180.01");
        assert_eq!(money(&dec("0.5")), "0.50");
    }
}
