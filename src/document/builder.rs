//! Turn drafts into fully computed documents

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::document::{CreditNoteDraft, InvoiceDraft, LineItemInput};
use crate::tax::{
    compute_tax, credit_note_supply_state, invoice_supply_state, line_amount, TaxBreakdown,
    TaxInput, TaxLine,
};
use crate::types::*;
use crate::utils::validation;

/// Filled lines with contiguous serial numbers and derived amounts
pub fn billable_lines(inputs: &[LineItemInput]) -> Vec<LineItem> {
    inputs
        .iter()
        .filter(|input| input.is_filled())
        .enumerate()
        .map(|(index, input)| LineItem {
            serial_number: index as u32 + 1,
            item_id: input.item_id,
            description: input.description.trim().to_string(),
            hsn_code: input.hsn_code.clone().filter(|code| !code.trim().is_empty()),
            quantity: input.quantity.clone(),
            unit: input.unit.clone(),
            rate: input.rate.clone(),
            amount: line_amount(&input.quantity, &input.rate),
        })
        .collect()
}

fn tax_lines(inputs: &[LineItemInput]) -> Vec<TaxLine> {
    inputs
        .iter()
        .filter(|input| input.is_filled())
        .map(|input| TaxLine {
            quantity: input.quantity.clone(),
            rate: input.rate.clone(),
            item_gst_rate: input.catalog_gst_rate().cloned(),
        })
        .collect()
}

fn default_gst_rate(settings: &CompanySettings, config: &BillingConfig) -> BigDecimal {
    settings
        .default_gst_rate
        .clone()
        .unwrap_or_else(|| config.fallback_gst_rate.clone())
}

fn check_number(kind: DocumentKind, is_draft: bool, number: Option<u64>) -> BillingResult<()> {
    match (is_draft, number) {
        (true, Some(_)) => Err(BillingError::Validation(format!(
            "Draft {} cannot carry a number",
            kind
        ))),
        (false, None) => Err(BillingError::Validation(format!(
            "A final {} needs a number",
            kind
        ))),
        _ => Ok(()),
    }
}

/// Compute an invoice from its draft.
///
/// `invoice_number` is the number handed out by the allocator (`None` for drafts).
pub fn build_invoice(
    draft: &InvoiceDraft,
    settings: &CompanySettings,
    config: &BillingConfig,
    invoice_number: Option<u64>,
) -> BillingResult<Invoice> {
    validation::validate_required_invoice_fields(draft)?;
    check_number(DocumentKind::Invoice, draft.is_draft, invoice_number)?;

    let company_state_code = config.company_state_code(&settings.state_code);
    let supply_state_code = invoice_supply_state(
        draft.place_of_supply_state_code.as_deref(),
        draft.billed_to.state_code.as_deref(),
        company_state_code,
    );

    let breakdown: TaxBreakdown = compute_tax(&TaxInput {
        lines: tax_lines(&draft.line_items),
        packaging_charges: draft.packaging_charges.clone(),
        supplier_state_code: company_state_code.to_string(),
        counterparty_state_code: supply_state_code.to_string(),
        default_gst_rate: default_gst_rate(settings, config),
    })?;

    let due_date = draft.due_date.or_else(|| {
        draft
            .payment_terms
            .and_then(|terms| terms.due_date(draft.invoice_date))
    });

    let now = chrono::Utc::now().naive_utc();
    Ok(Invoice {
        id: Uuid::new_v4(),
        invoice_number,
        is_draft: draft.is_draft,
        invoice_date: draft.invoice_date,
        due_date,
        party_id: draft.party_id,
        party_gstin: non_blank(draft.party_gstin.as_deref()).map(str::to_uppercase),
        billed_to: draft.billed_to.clone(),
        shipped_to: draft
            .shipped_to
            .clone()
            .filter(|shipped| !shipped.name.trim().is_empty()),
        place_of_supply: draft.place_of_supply.clone(),
        place_of_supply_state_code: non_blank(draft.place_of_supply_state_code.as_deref())
            .map(str::to_string),
        transport: draft.transport.clone(),
        line_items: billable_lines(&draft.line_items),
        amount_before_tax: breakdown.amount_before_tax.clone(),
        packaging_charges: draft.packaging_charges.clone(),
        sub_total: breakdown.sub_total.clone(),
        tax: breakdown.components(),
        grand_total: breakdown.grand_total.clone(),
        amount_in_words: breakdown.amount_in_words,
        reverse_charge: draft.reverse_charge,
        notes: draft.notes.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Compute a credit note from its draft. Credit notes carry no packaging.
pub fn build_credit_note(
    draft: &CreditNoteDraft,
    settings: &CompanySettings,
    config: &BillingConfig,
    credit_note_number: Option<u64>,
) -> BillingResult<CreditNote> {
    validation::validate_required_credit_note_fields(draft)?;
    check_number(DocumentKind::CreditNote, draft.is_draft, credit_note_number)?;

    let company_state_code = config.company_state_code(&settings.state_code);
    let supply_state_code =
        credit_note_supply_state(draft.party.state_code.as_deref(), company_state_code);

    let breakdown = compute_tax(&TaxInput {
        lines: tax_lines(&draft.line_items),
        packaging_charges: BigDecimal::zero(),
        supplier_state_code: company_state_code.to_string(),
        counterparty_state_code: supply_state_code.to_string(),
        default_gst_rate: default_gst_rate(settings, config),
    })?;

    let now = chrono::Utc::now().naive_utc();
    Ok(CreditNote {
        id: Uuid::new_v4(),
        credit_note_number,
        is_draft: draft.is_draft,
        credit_note_date: draft.credit_note_date,
        original_invoice_id: draft.original_invoice_id,
        party_id: draft.party_id,
        party_gstin: non_blank(draft.party_gstin.as_deref()).map(str::to_uppercase),
        party: draft.party.clone(),
        reason: draft.reason.trim().to_string(),
        line_items: billable_lines(&draft.line_items),
        amount_before_tax: breakdown.amount_before_tax.clone(),
        tax: breakdown.components(),
        total_amount: breakdown.grand_total.clone(),
        amount_in_words: breakdown.amount_in_words,
        notes: draft.notes.clone(),
        created_at: now,
        updated_at: now,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn settings() -> CompanySettings {
        CompanySettings::new("Acme Plastics", "07AAAAA0000A1Z5", "07")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn snapshot(state_code: &str) -> PartySnapshot {
        PartySnapshot {
            name: "Sharma Traders".to_string(),
            address: None,
            state: None,
            state_code: Some(state_code.to_string()),
        }
    }

    #[test]
    fn test_blank_lines_dropped_and_renumbered() {
        let inputs = vec![
            LineItemInput::new("Bucket", dec("10"), dec("5")),
            LineItemInput::new("  ", dec("1"), dec("1")),
            LineItemInput::new("Mug", dec("0"), dec("9")),
            LineItemInput::new("Tub", dec("3"), dec("33.333")),
        ];
        let lines = billable_lines(&inputs);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].serial_number, 1);
        assert_eq!(lines[1].serial_number, 2);
        assert_eq!(lines[1].description, "Tub");
        assert_eq!(lines[1].amount, dec("100.00"));
    }

    #[test]
    fn test_build_intra_state_invoice() {
        let draft = InvoiceDraft::new(date(), snapshot("07"))
            .add_line(LineItemInput::new("Bucket", dec("10"), dec("5")))
            .add_line(LineItemInput::new("Tub", dec("2"), dec("50")))
            .add_line(LineItemInput::new("Lid", dec("1"), dec("25")));
        let mut draft = draft;
        draft.packaging_charges = dec("10");

        let invoice = build_invoice(&draft, &settings(), &BillingConfig::default(), Some(5)).unwrap();
        assert_eq!(invoice.invoice_number, Some(5));
        assert_eq!(invoice.sub_total, dec("185.00"));
        assert_eq!(invoice.tax.cgst_amount(), dec("16.65"));
        assert_eq!(invoice.grand_total, dec("218.30"));
        assert_eq!(
            invoice.amount_in_words,
            "Two Hundred Eighteen Rupees and Thirty Paise Only"
        );
    }

    #[test]
    fn test_place_of_supply_overrides_billed_state() {
        let mut draft = InvoiceDraft::new(date(), snapshot("07"))
            .add_line(LineItemInput::new("Bucket", dec("1"), dec("1000")));
        draft.place_of_supply_state_code = Some("27".to_string());

        let invoice = build_invoice(&draft, &settings(), &BillingConfig::default(), Some(1)).unwrap();
        assert_eq!(invoice.tax.igst_amount(), dec("180.00"));
    }

    #[test]
    fn test_catalog_rate_used_over_default() {
        let item = Item {
            id: Uuid::new_v4(),
            name: "Crate".to_string(),
            hsn_code: Some("3923".to_string()),
            default_unit: "Pcs".to_string(),
            default_rate: Some(dec("100")),
            gst_rate: dec("12"),
        };
        let draft = InvoiceDraft::new(date(), snapshot("07"))
            .add_line(LineItemInput::new("Loose", dec("1"), dec("100")))
            .add_line(LineItemInput::from_item(&item, dec("9")));

        let invoice = build_invoice(&draft, &settings(), &BillingConfig::default(), Some(1)).unwrap();
        // 1000 at 12% split 6% + 6%
        assert_eq!(invoice.tax.cgst_amount(), dec("60.00"));
        assert_eq!(invoice.line_items[1].hsn_code.as_deref(), Some("3923"));
    }

    #[test]
    fn test_due_date_from_payment_terms() {
        let mut draft = InvoiceDraft::new(date(), snapshot("07"))
            .add_line(LineItemInput::new("Bucket", dec("1"), dec("100")));
        draft.payment_terms = Some(PaymentTerms::Net30);

        let invoice = build_invoice(&draft, &settings(), &BillingConfig::default(), Some(1)).unwrap();
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 4, 9));
    }

    #[test]
    fn test_missing_party_name_rejected() {
        let draft = InvoiceDraft::new(date(), PartySnapshot::default())
            .add_line(LineItemInput::new("Bucket", dec("1"), dec("100")));
        assert!(matches!(
            build_invoice(&draft, &settings(), &BillingConfig::default(), Some(1)),
            Err(BillingError::Validation(_))
        ));
    }

    #[test]
    fn test_draft_must_not_carry_number() {
        let draft = InvoiceDraft::new(date(), snapshot("07"))
            .add_line(LineItemInput::new("Bucket", dec("1"), dec("100")))
            .as_draft();
        assert!(build_invoice(&draft, &settings(), &BillingConfig::default(), Some(3)).is_err());
        let invoice = build_invoice(&draft, &settings(), &BillingConfig::default(), None).unwrap();
        assert!(invoice.is_draft);
        assert_eq!(invoice.invoice_number, None);
    }

    #[test]
    fn test_credit_note_inter_state() {
        let draft = CreditNoteDraft::new(date(), snapshot("24"), "Goods returned")
            .add_line(LineItemInput::new("Bucket", dec("4"), dec("250")));

        let note = build_credit_note(&draft, &settings(), &BillingConfig::default(), Some(2)).unwrap();
        assert_eq!(note.amount_before_tax, dec("1000.00"));
        assert_eq!(note.tax.igst_amount(), dec("180.00"));
        assert_eq!(note.total_amount, dec("1180.00"));
        assert_eq!(note.reference(), "CN-2");
    }

    #[test]
    fn test_credit_note_requires_reason() {
        let draft = CreditNoteDraft::new(date(), snapshot("07"), "")
            .add_line(LineItemInput::new("Bucket", dec("1"), dec("100")));
        assert!(matches!(
            build_credit_note(&draft, &settings(), &BillingConfig::default(), Some(1)),
            Err(BillingError::Validation(_))
        ));
    }
}
