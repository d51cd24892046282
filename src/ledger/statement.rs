//! Party statement with running balance

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Invoice, Payment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntryKind {
    Invoice,
    Payment,
}

/// One row of a party ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: LedgerEntryKind,
    pub reference: String,
    pub description: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Cumulative `debit - credit` up to and including this row; positive means
    /// the party owes money
    pub balance: BigDecimal,
    /// Id of the invoice or payment behind this row
    pub source_id: Uuid,
}

fn invoice_entry(invoice: &Invoice) -> LedgerEntry {
    let description = match invoice.invoice_number {
        Some(number) => format!("Invoice #{}", number),
        None => "Draft invoice".to_string(),
    };
    LedgerEntry {
        date: invoice.invoice_date,
        kind: LedgerEntryKind::Invoice,
        reference: invoice.reference(),
        description,
        debit: invoice.grand_total.clone(),
        credit: BigDecimal::zero(),
        balance: BigDecimal::zero(),
        source_id: invoice.id,
    }
}

fn payment_entry(payment: &Payment, invoices: &[Invoice]) -> LedgerEntry {
    let invoice_reference = invoices
        .iter()
        .find(|invoice| invoice.id == payment.invoice_id)
        .map(Invoice::reference)
        .unwrap_or_else(|| "INV-?".to_string());

    let reference = payment
        .reference_number
        .clone()
        .filter(|reference| !reference.trim().is_empty())
        .unwrap_or_else(|| payment.payment_mode.to_string());

    LedgerEntry {
        date: payment.payment_date,
        kind: LedgerEntryKind::Payment,
        reference,
        description: format!(
            "Payment for {} ({})",
            invoice_reference, payment.payment_mode
        ),
        debit: BigDecimal::zero(),
        credit: payment.amount.clone(),
        balance: BigDecimal::zero(),
        source_id: payment.id,
    }
}

/// Build a chronological ledger from a party's invoices and payments.
///
/// Invoices are debits, payments credits. Rows on the same date keep their input
/// order with all invoices ahead of payments.
pub fn build_ledger(invoices: &[Invoice], payments: &[Payment]) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = invoices
        .iter()
        .map(invoice_entry)
        .chain(payments.iter().map(|payment| payment_entry(payment, invoices)))
        .collect();

    // sort_by_key is stable
    entries.sort_by_key(|entry| entry.date);

    let mut running = BigDecimal::zero();
    for entry in &mut entries {
        running += &entry.debit - &entry.credit;
        entry.balance = running.clone();
    }

    entries
}

/// Balance after the last row, zero for an empty ledger
pub fn closing_balance(entries: &[LedgerEntry]) -> BigDecimal {
    entries
        .last()
        .map(|entry| entry.balance.clone())
        .unwrap_or_else(BigDecimal::zero)
}
