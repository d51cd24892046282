//! Payment status of invoices

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::types::{Invoice, Payment};

/// Where an invoice stands against the payments received for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
    /// Not fully paid and past its due date
    Overdue,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}

/// Total received per invoice
pub fn paid_by_invoice(payments: &[Payment]) -> HashMap<Uuid, BigDecimal> {
    let mut totals: HashMap<Uuid, BigDecimal> = HashMap::new();
    for payment in payments {
        *totals.entry(payment.invoice_id).or_insert_with(BigDecimal::zero) += &payment.amount;
    }
    totals
}

/// Amount received for one invoice, zero when nothing was paid
pub fn paid_amount(paid: &HashMap<Uuid, BigDecimal>, invoice_id: Uuid) -> BigDecimal {
    paid.get(&invoice_id).cloned().unwrap_or_else(BigDecimal::zero)
}

/// `max(0, grand_total - paid)`
pub fn amount_due(invoice: &Invoice, paid: &BigDecimal) -> BigDecimal {
    let due = &invoice.grand_total - paid;
    if due > BigDecimal::zero() {
        due
    } else {
        BigDecimal::zero()
    }
}

/// Status of `invoice` given the amount already paid against it.
///
/// Overdue wins over Partial and Unpaid, never over Paid.
pub fn payment_status(invoice: &Invoice, paid: &BigDecimal, today: NaiveDate) -> PaymentStatus {
    if *paid >= invoice.grand_total {
        return PaymentStatus::Paid;
    }
    if invoice.due_date.is_some_and(|due| due < today) {
        return PaymentStatus::Overdue;
    }
    if *paid > BigDecimal::zero() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::invoice;
    use crate::types::PaymentMode;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        let mut inv = invoice(1, date(1), "1000");
        inv.due_date = Some(date(10));

        assert_eq!(payment_status(&inv, &BigDecimal::from(0), date(5)), PaymentStatus::Unpaid);
        assert_eq!(payment_status(&inv, &BigDecimal::from(400), date(5)), PaymentStatus::Partial);
        assert_eq!(payment_status(&inv, &BigDecimal::from(400), date(11)), PaymentStatus::Overdue);
        assert_eq!(payment_status(&inv, &BigDecimal::from(0), date(11)), PaymentStatus::Overdue);
        assert_eq!(payment_status(&inv, &BigDecimal::from(1000), date(30)), PaymentStatus::Paid);
    }

    #[test]
    fn test_due_on_today_is_not_overdue() {
        let mut inv = invoice(1, date(1), "1000");
        inv.due_date = Some(date(10));
        assert_eq!(payment_status(&inv, &BigDecimal::from(0), date(10)), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_no_due_date_never_overdue() {
        let inv = invoice(1, date(1), "1000");
        assert_eq!(payment_status(&inv, &BigDecimal::from(0), date(30)), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_paid_totals_and_due() {
        let inv = invoice(1, date(1), "1000");
        let payments = vec![
            Payment::new(inv.id, date(2), BigDecimal::from(300), PaymentMode::Cash),
            Payment::new(inv.id, date(3), BigDecimal::from(900), PaymentMode::Upi),
        ];
        let paid = paid_by_invoice(&payments);
        let total = paid_amount(&paid, inv.id);
        assert_eq!(total, BigDecimal::from(1200));
        assert_eq!(amount_due(&inv, &total), BigDecimal::from(0));
        assert_eq!(paid_amount(&paid, Uuid::new_v4()), BigDecimal::from(0));
    }
}
