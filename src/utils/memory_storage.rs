//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development.
///
/// Clones share the same underlying data, like handles to one database.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    settings: Arc<RwLock<CompanySettings>>,
    invoices: Arc<RwLock<Vec<Invoice>>>,
    credit_notes: Arc<RwLock<Vec<CreditNote>>>,
    payments: Arc<RwLock<Vec<Payment>>>,
}

fn read<T>(lock: &RwLock<T>) -> BillingResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| BillingError::Storage("storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> BillingResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| BillingError::Storage("storage lock poisoned".to_string()))
}

impl MemoryStorage {
    /// Create a new memory storage instance seeded with company settings
    pub fn new(settings: CompanySettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            invoices: Arc::new(RwLock::new(Vec::new())),
            credit_notes: Arc::new(RwLock::new(Vec::new())),
            payments: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl BillingStore for MemoryStorage {
    async fn get_settings(&self) -> BillingResult<CompanySettings> {
        Ok(read(&self.settings)?.clone())
    }

    async fn save_settings(&mut self, settings: &CompanySettings) -> BillingResult<()> {
        *write(&self.settings)? = settings.clone();
        Ok(())
    }

    async fn raise_counter(&mut self, kind: DocumentKind, at_least: u64) -> BillingResult<u64> {
        let mut settings = write(&self.settings)?;
        let counter = match kind {
            DocumentKind::Invoice => &mut settings.next_invoice_number,
            DocumentKind::CreditNote => &mut settings.next_credit_note_number,
        };
        *counter = (*counter).max(at_least);
        Ok(*counter)
    }

    async fn save_invoice(&mut self, invoice: &Invoice) -> BillingResult<()> {
        let mut invoices = write(&self.invoices)?;
        if let Some(number) = invoice.invoice_number {
            if invoices.iter().any(|existing| existing.invoice_number == Some(number)) {
                return Err(BillingError::DuplicateNumber {
                    kind: DocumentKind::Invoice,
                    number,
                });
            }
        }
        invoices.push(invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, invoice_id: Uuid) -> BillingResult<Option<Invoice>> {
        Ok(read(&self.invoices)?
            .iter()
            .find(|invoice| invoice.id == invoice_id)
            .cloned())
    }

    async fn list_invoices(&self, party_id: Option<Uuid>) -> BillingResult<Vec<Invoice>> {
        let mut filtered: Vec<Invoice> = read(&self.invoices)?
            .iter()
            .filter(|invoice| party_id.is_none_or(|id| invoice.party_id == Some(id)))
            .cloned()
            .collect();
        filtered.sort_by_key(|invoice| invoice.invoice_date);
        Ok(filtered)
    }

    async fn delete_invoice(&mut self, invoice_id: Uuid) -> BillingResult<()> {
        let mut invoices = write(&self.invoices)?;
        let before = invoices.len();
        invoices.retain(|invoice| invoice.id != invoice_id);
        if invoices.len() == before {
            return Err(BillingError::NotFound(format!("invoice {}", invoice_id)));
        }
        write(&self.payments)?.retain(|payment| payment.invoice_id != invoice_id);
        Ok(())
    }

    async fn save_credit_note(&mut self, credit_note: &CreditNote) -> BillingResult<()> {
        let mut credit_notes = write(&self.credit_notes)?;
        if let Some(number) = credit_note.credit_note_number {
            if credit_notes
                .iter()
                .any(|existing| existing.credit_note_number == Some(number))
            {
                return Err(BillingError::DuplicateNumber {
                    kind: DocumentKind::CreditNote,
                    number,
                });
            }
        }
        credit_notes.push(credit_note.clone());
        Ok(())
    }

    async fn list_credit_notes(&self) -> BillingResult<Vec<CreditNote>> {
        let mut notes = read(&self.credit_notes)?.clone();
        notes.sort_by_key(|note| note.credit_note_date);
        Ok(notes)
    }

    async fn delete_credit_note(&mut self, credit_note_id: Uuid) -> BillingResult<()> {
        let mut credit_notes = write(&self.credit_notes)?;
        let before = credit_notes.len();
        credit_notes.retain(|note| note.id != credit_note_id);
        if credit_notes.len() == before {
            return Err(BillingError::NotFound(format!(
                "credit note {}",
                credit_note_id
            )));
        }
        Ok(())
    }

    async fn save_payment(&mut self, payment: &Payment) -> BillingResult<()> {
        let invoice_exists = read(&self.invoices)?
            .iter()
            .any(|invoice| invoice.id == payment.invoice_id);
        if !invoice_exists {
            return Err(BillingError::NotFound(format!(
                "invoice {}",
                payment.invoice_id
            )));
        }
        write(&self.payments)?.push(payment.clone());
        Ok(())
    }

    async fn delete_payment(&mut self, payment_id: Uuid) -> BillingResult<()> {
        let mut payments = write(&self.payments)?;
        let before = payments.len();
        payments.retain(|payment| payment.id != payment_id);
        if payments.len() == before {
            return Err(BillingError::NotFound(format!("payment {}", payment_id)));
        }
        Ok(())
    }

    async fn list_payments(&self, invoice_ids: &[Uuid]) -> BillingResult<Vec<Payment>> {
        let mut filtered: Vec<Payment> = read(&self.payments)?
            .iter()
            .filter(|payment| invoice_ids.contains(&payment.invoice_id))
            .cloned()
            .collect();
        filtered.sort_by_key(|payment| payment.payment_date);
        Ok(filtered)
    }
}
