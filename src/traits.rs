//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use uuid::Uuid;

use crate::document::{CreditNoteDraft, InvoiceDraft};
use crate::types::*;
use crate::utils::validation;

/// Storage abstraction for billing records
///
/// The billing core never talks to a database directly. Any record store
/// (PostgreSQL, a hosted backend, in-memory, etc.) can back it by implementing
/// these methods.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Read the company settings singleton
    async fn get_settings(&self) -> BillingResult<CompanySettings>;

    /// Replace the company settings singleton
    async fn save_settings(&mut self, settings: &CompanySettings) -> BillingResult<()>;

    /// Atomically set the counter for `kind` to `max(counter, at_least)` and
    /// return the resulting value.
    ///
    /// Implementations must make this a single compare-and-increment at the
    /// storage layer; several application instances may call it concurrently.
    async fn raise_counter(&mut self, kind: DocumentKind, at_least: u64) -> BillingResult<u64>;

    /// Insert an invoice with its line items.
    ///
    /// Must fail with [`BillingError::DuplicateNumber`] when a final invoice with
    /// the same number already exists, leaving nothing behind.
    async fn save_invoice(&mut self, invoice: &Invoice) -> BillingResult<()>;

    /// Get an invoice by ID
    async fn get_invoice(&self, invoice_id: Uuid) -> BillingResult<Option<Invoice>>;

    /// List invoices ordered by invoice date, optionally for a single party
    async fn list_invoices(&self, party_id: Option<Uuid>) -> BillingResult<Vec<Invoice>>;

    /// Delete an invoice together with its line items and payments
    async fn delete_invoice(&mut self, invoice_id: Uuid) -> BillingResult<()>;

    /// Insert a credit note; same uniqueness rule as invoices
    async fn save_credit_note(&mut self, credit_note: &CreditNote) -> BillingResult<()>;

    /// List credit notes ordered by credit note date
    async fn list_credit_notes(&self) -> BillingResult<Vec<CreditNote>>;

    /// Delete a credit note together with its line items
    async fn delete_credit_note(&mut self, credit_note_id: Uuid) -> BillingResult<()>;

    /// Record a payment against an existing invoice
    async fn save_payment(&mut self, payment: &Payment) -> BillingResult<()>;

    /// Delete a single payment
    async fn delete_payment(&mut self, payment_id: Uuid) -> BillingResult<()>;

    /// Payments for the given invoices, ordered by payment date
    async fn list_payments(&self, invoice_ids: &[Uuid]) -> BillingResult<Vec<Payment>>;
}

/// Trait for implementing custom document validation rules
pub trait DocumentValidator: Send + Sync {
    /// Validate an invoice draft before anything is computed or stored
    fn validate_invoice_draft(&self, draft: &InvoiceDraft) -> BillingResult<()>;

    /// Validate a credit note draft before anything is computed or stored
    fn validate_credit_note_draft(&self, draft: &CreditNoteDraft) -> BillingResult<()>;
}

/// Default validator: required fields only
pub struct DefaultDocumentValidator;

impl DocumentValidator for DefaultDocumentValidator {
    fn validate_invoice_draft(&self, draft: &InvoiceDraft) -> BillingResult<()> {
        validation::validate_required_invoice_fields(draft)
    }

    fn validate_credit_note_draft(&self, draft: &CreditNoteDraft) -> BillingResult<()> {
        validation::validate_required_credit_note_fields(draft)
    }
}
