//! Issuing orchestrator that ties validation, numbering, tax computation and
//! storage together

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::document::{build_credit_note, build_invoice, CreditNoteDraft, InvoiceDraft};
use crate::gstr1::{FilingPeriod, Gstr1Report};
use crate::ledger::*;
use crate::numbering::{allocate_number, Allocation};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_positive_amount;

/// A saved document together with the counter value now in storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issued<T> {
    pub document: T,
    pub next_counter: u64,
}

/// Payment position of one invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceStatus {
    pub invoice_id: Uuid,
    pub reference: String,
    pub grand_total: bigdecimal::BigDecimal,
    pub paid: bigdecimal::BigDecimal,
    pub status: PaymentStatus,
}

/// Everything shown on a party's account page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyLedger {
    pub party_id: Uuid,
    pub entries: Vec<LedgerEntry>,
    pub summary: PartySummary,
    pub invoices: Vec<InvoiceStatus>,
}

/// Billing front door: issues documents and derives reports from a [`BillingStore`]
pub struct DocumentIssuer<S: BillingStore> {
    storage: S,
    validator: Box<dyn DocumentValidator>,
    config: BillingConfig,
}

impl<S: BillingStore> DocumentIssuer<S> {
    /// Create an issuer with the default validator and configuration
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultDocumentValidator),
            config: BillingConfig::default(),
        }
    }

    /// Create an issuer with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn DocumentValidator>) -> Self {
        Self {
            storage,
            validator,
            config: BillingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BillingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate, number, compute and save an invoice, then advance the counter.
    ///
    /// A duplicate number fails before anything is stored. A counter failure after
    /// the invoice was saved comes back as [`BillingError::CounterUpdateFailed`].
    #[instrument(skip(self, draft), fields(is_draft = draft.is_draft, invoice_number))]
    pub async fn issue_invoice(&mut self, draft: &InvoiceDraft) -> BillingResult<Issued<Invoice>> {
        self.validator.validate_invoice_draft(draft)?;

        let settings = self.storage.get_settings().await?;
        let allocation = allocate_number(
            DocumentKind::Invoice,
            settings.next_invoice_number,
            draft.number,
            draft.is_draft,
        )?;
        if let Some(number) = allocation.assigned {
            Span::current().record("invoice_number", number);
        }

        let invoice = build_invoice(draft, &settings, &self.config, allocation.assigned)?;

        if let Err(err) = self.storage.save_invoice(&invoice).await {
            if let BillingError::DuplicateNumber { number, .. } = &err {
                warn!(number, "invoice number already in use");
            }
            return Err(err);
        }

        let next_counter = self
            .apply_counter(DocumentKind::Invoice, &allocation)
            .await?;

        info!(
            reference = %invoice.reference(),
            grand_total = %invoice.grand_total,
            next_counter,
            "invoice issued"
        );
        Ok(Issued {
            document: invoice,
            next_counter,
        })
    }

    /// Credit note counterpart of [`issue_invoice`](Self::issue_invoice)
    #[instrument(skip(self, draft), fields(is_draft = draft.is_draft, credit_note_number))]
    pub async fn issue_credit_note(
        &mut self,
        draft: &CreditNoteDraft,
    ) -> BillingResult<Issued<CreditNote>> {
        self.validator.validate_credit_note_draft(draft)?;

        let settings = self.storage.get_settings().await?;
        let allocation = allocate_number(
            DocumentKind::CreditNote,
            settings.next_credit_note_number,
            draft.number,
            draft.is_draft,
        )?;
        if let Some(number) = allocation.assigned {
            Span::current().record("credit_note_number", number);
        }

        let credit_note = build_credit_note(draft, &settings, &self.config, allocation.assigned)?;

        if let Err(err) = self.storage.save_credit_note(&credit_note).await {
            if let BillingError::DuplicateNumber { number, .. } = &err {
                warn!(number, "credit note number already in use");
            }
            return Err(err);
        }

        let next_counter = self
            .apply_counter(DocumentKind::CreditNote, &allocation)
            .await?;

        info!(
            reference = %credit_note.reference(),
            total_amount = %credit_note.total_amount,
            next_counter,
            "credit note issued"
        );
        Ok(Issued {
            document: credit_note,
            next_counter,
        })
    }

    async fn apply_counter(
        &mut self,
        kind: DocumentKind,
        allocation: &Allocation,
    ) -> BillingResult<u64> {
        let Some(number) = allocation.assigned else {
            return Ok(allocation.next_counter);
        };

        match self.storage.raise_counter(kind, allocation.next_counter).await {
            Ok(counter) => Ok(counter),
            Err(err) => {
                warn!(%kind, number, error = %err, "document saved but counter not advanced");
                Err(BillingError::CounterUpdateFailed {
                    kind,
                    number,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Record a payment against an existing invoice
    #[instrument(skip(self, payment), fields(invoice_id = %payment.invoice_id))]
    pub async fn record_payment(&mut self, payment: Payment) -> BillingResult<Payment> {
        validate_positive_amount(&payment.amount)?;
        self.storage.save_payment(&payment).await?;
        info!(amount = %payment.amount, mode = %payment.payment_mode, "payment recorded");
        Ok(payment)
    }

    pub async fn delete_payment(&mut self, payment_id: Uuid) -> BillingResult<()> {
        self.storage.delete_payment(payment_id).await
    }

    /// Delete an invoice; its payments go with it
    pub async fn delete_invoice(&mut self, invoice_id: Uuid) -> BillingResult<()> {
        self.storage.delete_invoice(invoice_id).await?;
        info!(%invoice_id, "invoice deleted");
        Ok(())
    }

    pub async fn delete_credit_note(&mut self, credit_note_id: Uuid) -> BillingResult<()> {
        self.storage.delete_credit_note(credit_note_id).await
    }

    async fn invoices_with_payments(
        &self,
        party_id: Option<Uuid>,
    ) -> BillingResult<(Vec<Invoice>, Vec<Payment>)> {
        let invoices = self.storage.list_invoices(party_id).await?;
        let ids: Vec<Uuid> = invoices.iter().map(|invoice| invoice.id).collect();
        let payments = self.storage.list_payments(&ids).await?;
        Ok((invoices, payments))
    }

    /// Running-balance ledger, totals and per-invoice status for one party
    pub async fn party_ledger(&self, party_id: Uuid, today: NaiveDate) -> BillingResult<PartyLedger> {
        let (invoices, payments) = self.invoices_with_payments(Some(party_id)).await?;
        let paid = paid_by_invoice(&payments);

        let statuses = invoices
            .iter()
            .map(|invoice| {
                let invoice_paid = paid_amount(&paid, invoice.id);
                InvoiceStatus {
                    invoice_id: invoice.id,
                    reference: invoice.reference(),
                    grand_total: invoice.grand_total.clone(),
                    status: payment_status(invoice, &invoice_paid, today),
                    paid: invoice_paid,
                }
            })
            .collect();

        Ok(PartyLedger {
            party_id,
            entries: build_ledger(&invoices, &payments),
            summary: party_summary(&invoices, &payments),
            invoices: statuses,
        })
    }

    /// Aging of every invoice in storage as of `today`
    pub async fn aging_report(&self, today: NaiveDate) -> BillingResult<AgingReport> {
        let (invoices, payments) = self.invoices_with_payments(None).await?;
        Ok(build_aging(&invoices, &payments, today))
    }

    /// Parties with money outstanding, largest balance first
    pub async fn outstanding_by_party(&self) -> BillingResult<Vec<PartyOutstanding>> {
        let (invoices, payments) = self.invoices_with_payments(None).await?;
        Ok(outstanding_by_party(&invoices, &payments))
    }

    /// Sales totals for invoices dated within `from..=to`
    pub async fn sales_summary(&self, from: NaiveDate, to: NaiveDate) -> BillingResult<SalesSummary> {
        let (invoices, payments) = self.invoices_with_payments(None).await?;
        let in_range: Vec<Invoice> = invoices
            .into_iter()
            .filter(|invoice| invoice.invoice_date >= from && invoice.invoice_date <= to)
            .collect();
        Ok(sales_summary(&in_range, &payments))
    }

    /// GSTR-1 return for one filing period
    pub async fn gstr1_report(&self, period: FilingPeriod) -> BillingResult<Gstr1Report> {
        let settings = self.storage.get_settings().await?;
        let invoices = self.storage.list_invoices(None).await?;
        let credit_notes = self.storage.list_credit_notes().await?;
        Ok(Gstr1Report::build(
            &invoices,
            &credit_notes,
            &settings,
            period,
            &self.config,
        ))
    }
}
