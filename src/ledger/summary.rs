//! Totals for party pages and the reports dashboard

use bigdecimal::{BigDecimal, Zero};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::ledger::status::{amount_due, paid_amount, paid_by_invoice};
use crate::types::{Invoice, Payment};

/// Totals for one party's invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySummary {
    pub invoice_count: usize,
    pub total_billed: BigDecimal,
    pub total_paid: BigDecimal,
    /// `total_billed - total_paid`, negative when the party overpaid
    pub total_due: BigDecimal,
}

pub fn party_summary(invoices: &[Invoice], payments: &[Payment]) -> PartySummary {
    let total_billed: BigDecimal = invoices.iter().map(|inv| inv.grand_total.clone()).sum();
    let total_paid: BigDecimal = payments.iter().map(|p| p.amount.clone()).sum();
    PartySummary {
        invoice_count: invoices.len(),
        total_due: &total_billed - &total_paid,
        total_billed,
        total_paid,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyOutstanding {
    pub party_id: Uuid,
    /// Name on the party's first invoice
    pub name: String,
    pub total: BigDecimal,
    pub paid: BigDecimal,
    pub due: BigDecimal,
    pub invoice_count: usize,
}

/// Parties that still owe money, largest balance first.
///
/// Invoices without a party id are walk-in sales and are left out.
pub fn outstanding_by_party(invoices: &[Invoice], payments: &[Payment]) -> Vec<PartyOutstanding> {
    let paid = paid_by_invoice(payments);
    let mut rows: Vec<PartyOutstanding> = Vec::new();

    for invoice in invoices {
        let Some(party_id) = invoice.party_id else {
            continue;
        };
        let invoice_paid = paid_amount(&paid, invoice.id);
        let due = amount_due(invoice, &invoice_paid);

        let position = match rows.iter().position(|row| row.party_id == party_id) {
            Some(position) => position,
            None => {
                rows.push(PartyOutstanding {
                    party_id,
                    name: invoice.billed_to.name.clone(),
                    total: BigDecimal::zero(),
                    paid: BigDecimal::zero(),
                    due: BigDecimal::zero(),
                    invoice_count: 0,
                });
                rows.len() - 1
            }
        };

        let row = &mut rows[position];
        row.total += &invoice.grand_total;
        row.paid += invoice_paid;
        row.due += due;
        row.invoice_count += 1;
    }

    rows.retain(|row| row.due > BigDecimal::zero());
    rows.sort_by(|a, b| b.due.cmp(&a.due));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub invoice_count: usize,
    pub total_sales: BigDecimal,
    pub total_tax: BigDecimal,
    pub total_paid: BigDecimal,
    pub total_due: BigDecimal,
}

/// Sales totals over `invoices`; only payments against those invoices count
pub fn sales_summary(invoices: &[Invoice], payments: &[Payment]) -> SalesSummary {
    let paid = paid_by_invoice(payments);
    let total_sales: BigDecimal = invoices.iter().map(|inv| inv.grand_total.clone()).sum();
    let total_tax: BigDecimal = invoices.iter().map(|inv| inv.tax.total()).sum();
    let total_paid: BigDecimal = invoices
        .iter()
        .map(|inv| paid_amount(&paid, inv.id))
        .sum();

    SalesSummary {
        invoice_count: invoices.len(),
        total_due: &total_sales - &total_paid,
        total_sales,
        total_tax,
        total_paid,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub sales: BigDecimal,
    pub count: usize,
}

impl MonthlySales {
    /// Short label such as `Mar 24`
    pub fn label(&self) -> String {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%b %y").to_string())
            .unwrap_or_else(|| format!("{:02}/{}", self.month, self.year))
    }
}

/// Sales for the `months` most recent calendar months that have invoices,
/// oldest first
pub fn monthly_sales(invoices: &[Invoice], months: usize) -> Vec<MonthlySales> {
    let mut by_month: BTreeMap<(i32, u32), (BigDecimal, usize)> = BTreeMap::new();
    for invoice in invoices {
        let key = (invoice.invoice_date.year(), invoice.invoice_date.month());
        let entry = by_month
            .entry(key)
            .or_insert_with(|| (BigDecimal::zero(), 0));
        entry.0 += &invoice.grand_total;
        entry.1 += 1;
    }

    let skip = by_month.len().saturating_sub(months);
    by_month
        .into_iter()
        .skip(skip)
        .map(|((year, month), (sales, count))| MonthlySales {
            year,
            month,
            sales,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dec, invoice, taxed_invoice};
    use crate::types::PaymentMode;
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_party_summary() {
        let a = invoice(1, date(1, 5), "1000");
        let b = invoice(2, date(1, 9), "500");
        let payments = vec![Payment::new(a.id, date(1, 20), dec("1200"), PaymentMode::Cash)];

        let summary = party_summary(&[a, b], &payments);
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.total_billed, dec("1500"));
        assert_eq!(summary.total_paid, dec("1200"));
        assert_eq!(summary.total_due, dec("300"));
    }

    #[test]
    fn test_outstanding_by_party_sorted_and_filtered() {
        let small_party = Uuid::new_v4();
        let big_party = Uuid::new_v4();
        let settled_party = Uuid::new_v4();

        let mut small = invoice(1, date(2, 1), "200");
        small.party_id = Some(small_party);
        let mut big_1 = invoice(2, date(2, 2), "900");
        big_1.party_id = Some(big_party);
        big_1.billed_to.name = "Verma & Sons".to_string();
        let mut big_2 = invoice(3, date(2, 3), "400");
        big_2.party_id = Some(big_party);
        let mut settled = invoice(4, date(2, 4), "100");
        settled.party_id = Some(settled_party);
        let walk_in = invoice(5, date(2, 5), "10000");

        let payments = vec![
            Payment::new(big_1.id, date(2, 10), dec("100"), PaymentMode::Cash),
            Payment::new(settled.id, date(2, 10), dec("100"), PaymentMode::Cash),
        ];

        let rows = outstanding_by_party(&[small, big_1, big_2, settled, walk_in], &payments);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].party_id, big_party);
        assert_eq!(rows[0].name, "Verma & Sons");
        assert_eq!(rows[0].due, dec("1200"));
        assert_eq!(rows[0].invoice_count, 2);
        assert_eq!(rows[1].party_id, small_party);
    }

    #[test]
    fn test_sales_summary_counts_tax() {
        let inv = taxed_invoice(1, date(3, 1), "1000", "18", "07", "07");
        let payments = vec![Payment::new(inv.id, date(3, 2), dec("180"), PaymentMode::Upi)];
        let summary = sales_summary(&[inv], &payments);
        assert_eq!(summary.total_sales, dec("1180.00"));
        assert_eq!(summary.total_tax, dec("180.00"));
        assert_eq!(summary.total_due, dec("1000.00"));
    }

    #[test]
    fn test_monthly_sales_keeps_latest_months() {
        let invoices: Vec<Invoice> = (1..=8)
            .map(|month| invoice(month as u64, date(month, 15), "100"))
            .chain(std::iter::once(invoice(9, date(8, 20), "50")))
            .collect();

        let months = monthly_sales(&invoices, 6);
        assert_eq!(months.len(), 6);
        assert_eq!((months[0].year, months[0].month), (2024, 3));
        let last = months.last().unwrap();
        assert_eq!(last.month, 8);
        assert_eq!(last.sales, dec("150"));
        assert_eq!(last.count, 2);
        assert_eq!(last.label(), "Aug 24");
    }
}
