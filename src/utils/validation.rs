//! Validation utilities

use bigdecimal::{BigDecimal, Zero};

use crate::document::{CreditNoteDraft, InvoiceDraft, LineItemInput};
use crate::tax::GstCategory;
use crate::traits::*;
use crate::types::*;
use crate::utils::states;

/// Validate that a payment amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount <= BigDecimal::zero() {
        Err(BillingError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a party name is present
pub fn validate_party_name(name: &str) -> BillingResult<()> {
    if name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Please enter party name".to_string(),
        ));
    }

    if name.len() > 200 {
        return Err(BillingError::Validation(
            "Party name cannot exceed 200 characters".to_string(),
        ));
    }

    Ok(())
}

/// At least one line must have a description, quantity and rate
pub fn validate_line_items(lines: &[LineItemInput]) -> BillingResult<()> {
    if !lines.iter().any(LineItemInput::is_filled) {
        return Err(BillingError::Validation(
            "Please add at least one item".to_string(),
        ));
    }

    for line in lines.iter().filter(|line| line.is_filled()) {
        if line.quantity < BigDecimal::zero() || line.rate < BigDecimal::zero() {
            return Err(BillingError::Validation(format!(
                "Quantity and rate must not be negative for '{}'",
                line.description.trim()
            )));
        }
    }

    Ok(())
}

/// User-entered document numbers are positive integers
pub fn validate_document_number(kind: DocumentKind, number: Option<u64>) -> BillingResult<()> {
    if number == Some(0) {
        return Err(BillingError::Validation(format!(
            "Please enter a valid {} number",
            kind.to_string().to_lowercase()
        )));
    }
    Ok(())
}

/// Required fields of an invoice; drafts skip the number check
pub fn validate_required_invoice_fields(draft: &InvoiceDraft) -> BillingResult<()> {
    if !draft.is_draft {
        validate_document_number(DocumentKind::Invoice, draft.number)?;
    }
    validate_party_name(&draft.billed_to.name)?;
    validate_line_items(&draft.line_items)?;

    if draft.packaging_charges < BigDecimal::zero() {
        return Err(BillingError::Validation(
            "Packaging charges cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Required fields of a credit note
pub fn validate_required_credit_note_fields(draft: &CreditNoteDraft) -> BillingResult<()> {
    if !draft.is_draft {
        validate_document_number(DocumentKind::CreditNote, draft.number)?;
    }
    validate_party_name(&draft.party.name)?;

    if draft.reason.trim().is_empty() {
        return Err(BillingError::Validation(
            "Please select a reason".to_string(),
        ));
    }

    validate_line_items(&draft.line_items)
}

/// Validate GSTIN format: 2-digit state, 10-char PAN, entity digit, `Z`, checksum char
pub fn validate_gstin(gstin: &str) -> BillingResult<()> {
    let gstin = gstin.trim().to_uppercase();
    let chars: Vec<char> = gstin.chars().collect();

    let well_formed = chars.len() == 15
        && chars[0..2].iter().all(|c| c.is_ascii_digit())
        && chars[2..7].iter().all(|c| c.is_ascii_uppercase())
        && chars[7..11].iter().all(|c| c.is_ascii_digit())
        && chars[11].is_ascii_uppercase()
        && (chars[12].is_ascii_uppercase() || ('1'..='9').contains(&chars[12]))
        && chars[13] == 'Z'
        && chars[14].is_ascii_alphanumeric();

    if !well_formed {
        return Err(BillingError::Validation(format!(
            "Invalid GSTIN format: {}",
            gstin
        )));
    }

    Ok(())
}

/// State code encoded in the first two digits of a GSTIN
pub fn gstin_state_code(gstin: &str) -> Option<&str> {
    gstin.get(0..2).filter(|code| states::state_name(code).is_some())
}

fn validate_gstin_against_state(gstin: Option<&str>, state_code: Option<&str>) -> BillingResult<()> {
    let Some(gstin) = gstin.map(str::trim).filter(|g| !g.is_empty()) else {
        return Ok(());
    };
    validate_gstin(gstin)?;

    let gstin_state = gstin_state_code(gstin).ok_or_else(|| {
        BillingError::Validation(format!("GSTIN {} has an unknown state code", gstin))
    })?;
    if let Some(state_code) = state_code.filter(|code| !code.trim().is_empty()) {
        if state_code.trim() != gstin_state {
            return Err(BillingError::Validation(format!(
                "GSTIN {} belongs to state {} but party state is {}",
                gstin, gstin_state, state_code
            )));
        }
    }
    Ok(())
}

fn validate_standard_rates(lines: &[LineItemInput]) -> BillingResult<()> {
    for line in lines.iter().filter(|line| line.is_filled()) {
        if let Some(rate) = line.catalog_gst_rate() {
            if GstCategory::from_rate(rate).is_none() {
                return Err(BillingError::Validation(format!(
                    "GST rate {}% on '{}' is not a standard slab",
                    rate,
                    line.description.trim()
                )));
            }
        }
    }
    Ok(())
}

fn validate_state_code(state_code: Option<&str>) -> BillingResult<()> {
    match state_code.filter(|code| !code.trim().is_empty()) {
        Some(code) if states::state_name(code).is_none() => Err(BillingError::Validation(
            format!("Unknown state code: {}", code),
        )),
        _ => Ok(()),
    }
}

/// Strict validator: required fields plus GSTIN, state code and rate slab checks
pub struct StrictDocumentValidator;

impl DocumentValidator for StrictDocumentValidator {
    fn validate_invoice_draft(&self, draft: &InvoiceDraft) -> BillingResult<()> {
        validate_required_invoice_fields(draft)?;
        validate_state_code(draft.billed_to.state_code.as_deref())?;
        validate_state_code(draft.place_of_supply_state_code.as_deref())?;
        validate_gstin_against_state(
            draft.party_gstin.as_deref(),
            draft.billed_to.state_code.as_deref(),
        )?;
        validate_standard_rates(&draft.line_items)
    }

    fn validate_credit_note_draft(&self, draft: &CreditNoteDraft) -> BillingResult<()> {
        validate_required_credit_note_fields(draft)?;
        validate_state_code(draft.party.state_code.as_deref())?;
        validate_gstin_against_state(
            draft.party_gstin.as_deref(),
            draft.party.state_code.as_deref(),
        )?;
        validate_standard_rates(&draft.line_items)
    }
}
