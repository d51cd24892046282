//! Draft documents as entered by the user, and building them into invoices and
//! credit notes

pub mod builder;

pub use builder::*;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

/// Line as typed on the entry form, before amounts are derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub item_id: Option<Uuid>,
    pub description: String,
    pub hsn_code: Option<String>,
    pub quantity: BigDecimal,
    pub unit: String,
    pub rate: BigDecimal,
    /// Rate of the referenced catalog item; ignored for free-text lines
    pub item_gst_rate: Option<BigDecimal>,
}

impl LineItemInput {
    /// Free-text line
    pub fn new(description: impl Into<String>, quantity: BigDecimal, rate: BigDecimal) -> Self {
        Self {
            item_id: None,
            description: description.into(),
            hsn_code: None,
            quantity,
            unit: "Pcs".to_string(),
            rate,
            item_gst_rate: None,
        }
    }

    /// Line pre-filled from a catalog item
    pub fn from_item(item: &Item, quantity: BigDecimal) -> Self {
        Self {
            item_id: Some(item.id),
            description: item.name.clone(),
            hsn_code: item.hsn_code.clone(),
            quantity,
            unit: item.default_unit.clone(),
            rate: item.default_rate.clone().unwrap_or_else(BigDecimal::zero),
            item_gst_rate: Some(item.gst_rate.clone()),
        }
    }

    pub fn with_rate(mut self, rate: BigDecimal) -> Self {
        self.rate = rate;
        self
    }

    /// Blank rows and rows without quantity or rate are not billed
    pub fn is_filled(&self) -> bool {
        !self.description.trim().is_empty() && !self.quantity.is_zero() && !self.rate.is_zero()
    }

    /// Catalog rate, only when the line actually references a catalog item
    pub fn catalog_gst_rate(&self) -> Option<&BigDecimal> {
        self.item_id.and(self.item_gst_rate.as_ref())
    }
}

/// Invoice as entered, before numbering and tax computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// User-entered number; `None` takes the counter's next value
    pub number: Option<u64>,
    /// Save without a number and without touching the counter
    pub is_draft: bool,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub payment_terms: Option<PaymentTerms>,
    pub party_id: Option<Uuid>,
    pub party_gstin: Option<String>,
    pub billed_to: PartySnapshot,
    pub shipped_to: Option<PartySnapshot>,
    pub place_of_supply: Option<String>,
    pub place_of_supply_state_code: Option<String>,
    pub transport: TransportDetails,
    pub line_items: Vec<LineItemInput>,
    pub packaging_charges: BigDecimal,
    pub reverse_charge: bool,
    pub notes: Option<String>,
}

impl InvoiceDraft {
    pub fn new(invoice_date: NaiveDate, billed_to: PartySnapshot) -> Self {
        Self {
            number: None,
            is_draft: false,
            invoice_date,
            due_date: None,
            payment_terms: None,
            party_id: None,
            party_gstin: None,
            billed_to,
            shipped_to: None,
            place_of_supply: None,
            place_of_supply_state_code: None,
            transport: TransportDetails::default(),
            line_items: Vec::new(),
            packaging_charges: BigDecimal::zero(),
            reverse_charge: false,
            notes: None,
        }
    }

    /// Start an invoice for a saved party, copying its details as of today
    pub fn for_party(party: &Party, invoice_date: NaiveDate) -> Self {
        let mut draft = Self::new(invoice_date, PartySnapshot::from_party(party));
        draft.party_id = Some(party.id);
        draft.party_gstin = party.gstin.clone();
        draft.place_of_supply = party.state.clone();
        draft.place_of_supply_state_code = party.state_code.clone();
        draft.payment_terms = party.payment_terms;
        draft
    }

    pub fn with_number(mut self, number: u64) -> Self {
        self.number = Some(number);
        self
    }

    pub fn as_draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    pub fn add_line(mut self, line: LineItemInput) -> Self {
        self.line_items.push(line);
        self
    }
}

/// Credit note as entered, before numbering and tax computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNoteDraft {
    pub number: Option<u64>,
    pub is_draft: bool,
    pub credit_note_date: NaiveDate,
    pub original_invoice_id: Option<Uuid>,
    pub party_id: Option<Uuid>,
    pub party_gstin: Option<String>,
    pub party: PartySnapshot,
    pub reason: String,
    pub line_items: Vec<LineItemInput>,
    pub notes: Option<String>,
}

impl CreditNoteDraft {
    pub fn new(credit_note_date: NaiveDate, party: PartySnapshot, reason: impl Into<String>) -> Self {
        Self {
            number: None,
            is_draft: false,
            credit_note_date,
            original_invoice_id: None,
            party_id: None,
            party_gstin: None,
            party,
            reason: reason.into(),
            line_items: Vec::new(),
            notes: None,
        }
    }

    /// Credit note against an issued invoice, carrying over its billed-to party
    pub fn against_invoice(
        invoice: &Invoice,
        credit_note_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        let mut draft = Self::new(credit_note_date, invoice.billed_to.clone(), reason);
        draft.original_invoice_id = Some(invoice.id);
        draft.party_id = invoice.party_id;
        draft.party_gstin = invoice.party_gstin.clone();
        draft
    }

    pub fn with_number(mut self, number: u64) -> Self {
        self.number = Some(number);
        self
    }

    pub fn add_line(mut self, line: LineItemInput) -> Self {
        self.line_items.push(line);
        self
    }
}

/// Common credit note reasons offered on the entry form
pub const CREDIT_NOTE_REASONS: [&str; 7] = [
    "Goods returned",
    "Defective goods",
    "Wrong goods delivered",
    "Rate difference",
    "Quality issue",
    "Discount on settlement",
    "Other",
];
