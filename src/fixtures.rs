//! Document fixtures shared by unit tests

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;
use uuid::Uuid;

use crate::tax::{round_money, GstRate};
use crate::types::*;

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

fn timestamp(date: NaiveDate) -> chrono::NaiveDateTime {
    date.and_hms_opt(10, 0, 0).unwrap()
}

/// Untaxed final invoice whose grand total equals its sub total
pub fn invoice(number: u64, invoice_date: NaiveDate, grand_total: &str) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        invoice_number: Some(number),
        is_draft: false,
        invoice_date,
        due_date: None,
        party_id: None,
        party_gstin: None,
        billed_to: PartySnapshot {
            name: "Walk-in Customer".to_string(),
            ..Default::default()
        },
        shipped_to: None,
        place_of_supply: None,
        place_of_supply_state_code: None,
        transport: TransportDetails::default(),
        line_items: Vec::new(),
        amount_before_tax: dec(grand_total),
        packaging_charges: dec("0"),
        sub_total: dec(grand_total),
        tax: TaxComponents::Nil,
        grand_total: dec(grand_total),
        amount_in_words: String::new(),
        reverse_charge: false,
        notes: None,
        created_at: timestamp(invoice_date),
        updated_at: timestamp(invoice_date),
    }
}

/// Final invoice taxed at `rate` on `sub_total`, supplied into `pos_state_code`
/// by a company registered in `company_state_code`
pub fn taxed_invoice(
    number: u64,
    invoice_date: NaiveDate,
    sub_total: &str,
    rate: &str,
    company_state_code: &str,
    pos_state_code: &str,
) -> Invoice {
    let sub_total = dec(sub_total);
    let gst_rate = GstRate::for_supply(dec(rate), company_state_code != pos_state_code);
    let tax = if gst_rate.igst_rate > dec("0") {
        TaxComponents::Inter {
            igst_amount: round_money(&(&sub_total * &gst_rate.igst_rate / dec("100"))),
            igst_rate: gst_rate.igst_rate,
        }
    } else {
        let half = round_money(&(&sub_total * &gst_rate.cgst_rate / dec("100")));
        TaxComponents::Intra {
            cgst_rate: gst_rate.cgst_rate,
            cgst_amount: half.clone(),
            sgst_rate: gst_rate.sgst_rate,
            sgst_amount: half,
        }
    };

    let mut inv = invoice(number, invoice_date, "0");
    inv.grand_total = round_money(&(&sub_total + tax.total()));
    inv.amount_before_tax = sub_total.clone();
    inv.sub_total = sub_total;
    inv.tax = tax;
    inv.place_of_supply_state_code = Some(pos_state_code.to_string());
    inv
}

/// Final credit note mirroring [`taxed_invoice`]
pub fn taxed_credit_note(
    number: u64,
    credit_note_date: NaiveDate,
    amount_before_tax: &str,
    rate: &str,
    company_state_code: &str,
    party_state_code: &str,
) -> CreditNote {
    let inv = taxed_invoice(
        number,
        credit_note_date,
        amount_before_tax,
        rate,
        company_state_code,
        party_state_code,
    );
    CreditNote {
        id: Uuid::new_v4(),
        credit_note_number: Some(number),
        is_draft: false,
        credit_note_date,
        original_invoice_id: None,
        party_id: None,
        party_gstin: None,
        party: PartySnapshot {
            name: "Returning Customer".to_string(),
            state_code: Some(party_state_code.to_string()),
            ..Default::default()
        },
        reason: "Goods returned".to_string(),
        line_items: Vec::new(),
        amount_before_tax: inv.amount_before_tax,
        tax: inv.tax,
        total_amount: inv.grand_total,
        amount_in_words: String::new(),
        notes: None,
        created_at: inv.created_at,
        updated_at: inv.updated_at,
    }
}
