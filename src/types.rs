//! Core types and data structures for the billing system

use bigdecimal::{BigDecimal, Zero};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Counterparty (customer) master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    /// GST registration number, absent for unregistered buyers
    pub gstin: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    /// Two-digit GST state code
    pub state_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_terms: Option<PaymentTerms>,
}

impl Party {
    /// Create a party with only a name; everything else is optional
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gstin: None,
            address: None,
            state: None,
            state_code: None,
            phone: None,
            email: None,
            payment_terms: None,
        }
    }
}

/// Catalog entry reusable across line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub hsn_code: Option<String>,
    pub default_unit: String,
    pub default_rate: Option<BigDecimal>,
    /// GST rate percentage applied when this item is billed
    pub gst_rate: BigDecimal,
}

/// Payment terms offered to a party (days until due)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "Net 7")]
    Net7,
    #[serde(rename = "Net 15")]
    Net15,
    #[serde(rename = "Net 30")]
    Net30,
    #[serde(rename = "Net 45")]
    Net45,
    #[serde(rename = "Net 60")]
    Net60,
}

impl PaymentTerms {
    pub fn days(&self) -> u64 {
        match self {
            PaymentTerms::CashOnDelivery => 0,
            PaymentTerms::Net7 => 7,
            PaymentTerms::Net15 => 15,
            PaymentTerms::Net30 => 30,
            PaymentTerms::Net45 => 45,
            PaymentTerms::Net60 => 60,
        }
    }

    /// Due date for an invoice raised on `invoice_date` under these terms
    pub fn due_date(&self, invoice_date: NaiveDate) -> Option<NaiveDate> {
        invoice_date.checked_add_days(Days::new(self.days()))
    }
}

/// Copy of a party's identity taken when a document is created.
///
/// Documents keep this snapshot instead of a live reference so that editing the
/// party later never rewrites historical invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub name: String,
    pub address: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
}

impl PartySnapshot {
    pub fn from_party(party: &Party) -> Self {
        Self {
            name: party.name.clone(),
            address: party.address.clone(),
            state: party.state.clone(),
            state_code: party.state_code.clone(),
        }
    }
}

/// Line on an invoice or credit note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based, contiguous position within the document
    pub serial_number: u32,
    pub item_id: Option<Uuid>,
    pub description: String,
    pub hsn_code: Option<String>,
    pub quantity: BigDecimal,
    pub unit: String,
    pub rate: BigDecimal,
    /// Always `round(quantity * rate, 2)`
    pub amount: BigDecimal,
}

/// Tax components stored on a document.
///
/// A document is either intra-state (CGST + SGST), inter-state (IGST), or carries
/// no tax at all (0% GST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaxComponents {
    Intra {
        cgst_rate: BigDecimal,
        cgst_amount: BigDecimal,
        sgst_rate: BigDecimal,
        sgst_amount: BigDecimal,
    },
    Inter {
        igst_rate: BigDecimal,
        igst_amount: BigDecimal,
    },
    Nil,
}

impl TaxComponents {
    pub fn cgst_rate(&self) -> Option<&BigDecimal> {
        match self {
            TaxComponents::Intra { cgst_rate, .. } => Some(cgst_rate),
            _ => None,
        }
    }

    pub fn igst_rate(&self) -> Option<&BigDecimal> {
        match self {
            TaxComponents::Inter { igst_rate, .. } => Some(igst_rate),
            _ => None,
        }
    }

    pub fn cgst_amount(&self) -> BigDecimal {
        match self {
            TaxComponents::Intra { cgst_amount, .. } => cgst_amount.clone(),
            _ => BigDecimal::zero(),
        }
    }

    pub fn sgst_amount(&self) -> BigDecimal {
        match self {
            TaxComponents::Intra { sgst_amount, .. } => sgst_amount.clone(),
            _ => BigDecimal::zero(),
        }
    }

    pub fn igst_amount(&self) -> BigDecimal {
        match self {
            TaxComponents::Inter { igst_amount, .. } => igst_amount.clone(),
            _ => BigDecimal::zero(),
        }
    }

    /// CGST + SGST + IGST
    pub fn total(&self) -> BigDecimal {
        self.cgst_amount() + self.sgst_amount() + self.igst_amount()
    }

    pub fn is_intra_state(&self) -> bool {
        matches!(self, TaxComponents::Intra { .. })
    }
}

/// Transport details printed on the invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportDetails {
    pub mode: Option<String>,
    pub vehicle_number: Option<String>,
    pub gr_rr_number: Option<String>,
    pub total_packages: Option<u32>,
}

/// Tax invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    /// `None` while the invoice is an unnumbered draft
    pub invoice_number: Option<u64>,
    pub is_draft: bool,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub party_id: Option<Uuid>,
    pub party_gstin: Option<String>,
    pub billed_to: PartySnapshot,
    pub shipped_to: Option<PartySnapshot>,
    pub place_of_supply: Option<String>,
    pub place_of_supply_state_code: Option<String>,
    pub transport: TransportDetails,
    pub line_items: Vec<LineItem>,
    pub amount_before_tax: BigDecimal,
    pub packaging_charges: BigDecimal,
    /// `amount_before_tax + packaging_charges`
    pub sub_total: BigDecimal,
    pub tax: TaxComponents,
    pub grand_total: BigDecimal,
    pub amount_in_words: String,
    pub reverse_charge: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    /// `INV-<n>`, or `DRAFT` for unnumbered invoices
    pub fn reference(&self) -> String {
        DocumentKind::Invoice.reference(self.invoice_number)
    }
}

/// Credit note reducing the amount a party owes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: Uuid,
    pub credit_note_number: Option<u64>,
    pub is_draft: bool,
    pub credit_note_date: NaiveDate,
    pub original_invoice_id: Option<Uuid>,
    pub party_id: Option<Uuid>,
    pub party_gstin: Option<String>,
    pub party: PartySnapshot,
    pub reason: String,
    pub line_items: Vec<LineItem>,
    pub amount_before_tax: BigDecimal,
    pub tax: TaxComponents,
    /// Stored as a positive magnitude
    pub total_amount: BigDecimal,
    pub amount_in_words: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CreditNote {
    /// `CN-<n>`, or `DRAFT` for unnumbered notes
    pub fn reference(&self) -> String {
        DocumentKind::CreditNote.reference(self.credit_note_number)
    }
}

/// How a payment was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
    Cheque,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::Upi => "UPI",
            PaymentMode::Cheque => "Cheque",
        };
        f.write_str(label)
    }
}

/// Payment received against a single invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: BigDecimal,
    pub payment_mode: PaymentMode,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn new(
        invoice_id: Uuid,
        payment_date: NaiveDate,
        amount: BigDecimal,
        payment_mode: PaymentMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_id,
            payment_date,
            amount,
            payment_mode,
            reference_number: None,
            notes: None,
        }
    }
}

/// Issuing company's singleton settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySettings {
    pub company_name: String,
    pub gstin: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub state: String,
    pub state_code: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub default_terms: Option<String>,
    /// Next number offered for a final invoice
    pub next_invoice_number: u64,
    /// Next number offered for a final credit note
    pub next_credit_note_number: u64,
    pub default_gst_rate: Option<BigDecimal>,
}

impl CompanySettings {
    pub fn new(
        company_name: impl Into<String>,
        gstin: impl Into<String>,
        state_code: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            gstin: gstin.into(),
            address: String::new(),
            phone: None,
            email: None,
            state: String::new(),
            state_code: state_code.into(),
            bank_name: None,
            account_number: None,
            ifsc_code: None,
            default_terms: None,
            next_invoice_number: 1,
            next_credit_note_number: 1,
            default_gst_rate: None,
        }
    }

    /// Counter value for the given document kind
    pub fn next_number(&self, kind: DocumentKind) -> u64 {
        match kind {
            DocumentKind::Invoice => self.next_invoice_number,
            DocumentKind::CreditNote => self.next_credit_note_number,
        }
    }
}

/// Which numbering sequence a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    CreditNote,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::CreditNote => "CN",
        }
    }

    pub fn reference(&self, number: Option<u64>) -> String {
        match number {
            Some(n) => format!("{}-{}", self.prefix(), n),
            None => "DRAFT".to_string(),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Invoice => f.write_str("Invoice"),
            DocumentKind::CreditNote => f.write_str("Credit Note"),
        }
    }
}

/// Errors that can occur in the billing core
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Computation error: {0}")]
    Computation(String),
    #[error("{kind} #{number} already exists. Please use a different number.")]
    DuplicateNumber { kind: DocumentKind, number: u64 },
    #[error("{kind} #{number} was saved but the counter could not be updated: {reason}")]
    CounterUpdateFailed {
        kind: DocumentKind,
        number: u64,
        reason: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Export error: {0}")]
    Export(String),
}

impl BillingError {
    /// Whether the user can fix the failure by retrying with different input
    pub fn is_retryable(&self) -> bool {
        matches!(self, BillingError::DuplicateNumber { .. })
    }
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_terms_due_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(
            PaymentTerms::Net15.due_date(date),
            NaiveDate::from_ymd_opt(2024, 2, 4)
        );
        assert_eq!(PaymentTerms::CashOnDelivery.due_date(date), Some(date));
    }

    #[test]
    fn test_tax_components_accessors() {
        let intra = TaxComponents::Intra {
            cgst_rate: BigDecimal::from(9),
            cgst_amount: BigDecimal::from(90),
            sgst_rate: BigDecimal::from(9),
            sgst_amount: BigDecimal::from(90),
        };
        assert_eq!(intra.total(), BigDecimal::from(180));
        assert_eq!(intra.igst_amount(), BigDecimal::from(0));
        assert!(intra.is_intra_state());
        assert_eq!(TaxComponents::Nil.total(), BigDecimal::from(0));
    }

    #[test]
    fn test_document_references() {
        assert_eq!(DocumentKind::Invoice.reference(Some(42)), "INV-42");
        assert_eq!(DocumentKind::CreditNote.reference(Some(7)), "CN-7");
        assert_eq!(DocumentKind::Invoice.reference(None), "DRAFT");
    }

    #[test]
    fn test_duplicate_number_is_retryable() {
        let err = BillingError::DuplicateNumber {
            kind: DocumentKind::Invoice,
            number: 12,
        };
        assert!(err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Invoice #12 already exists. Please use a different number."
        );
        assert!(!BillingError::Validation("x".into()).is_retryable());
    }
}
