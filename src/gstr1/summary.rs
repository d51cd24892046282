//! Headline totals shown before exporting a return

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::gstr1::classify::Gstr1Classification;
use crate::types::{CreditNote, Invoice};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Summary {
    pub total_invoices: usize,
    pub b2b_count: usize,
    pub b2b_total: BigDecimal,
    pub b2cs_count: usize,
    pub b2cs_total: BigDecimal,
    pub b2cl_count: usize,
    pub b2cl_total: BigDecimal,
    pub credit_notes_count: usize,
    pub credit_notes_total: BigDecimal,
    /// CGST + SGST + IGST over all invoices of the period
    pub total_tax: BigDecimal,
    /// `b2b_total + b2cs_total + b2cl_total`
    pub grand_total: BigDecimal,
}

fn grand_totals(invoices: &[Invoice]) -> BigDecimal {
    invoices.iter().map(|inv| inv.grand_total.clone()).sum()
}

impl Gstr1Summary {
    pub fn new(classification: &Gstr1Classification, credit_notes: &[CreditNote]) -> Self {
        let b2b_total = grand_totals(&classification.b2b);
        let b2cs_total = grand_totals(&classification.b2cs);
        let b2cl_total = grand_totals(&classification.b2cl);

        let total_tax: BigDecimal = classification
            .b2b
            .iter()
            .chain(&classification.b2cs)
            .chain(&classification.b2cl)
            .map(|inv| inv.tax.total())
            .sum();

        Self {
            total_invoices: classification.b2b.len()
                + classification.b2cs.len()
                + classification.b2cl.len(),
            b2b_count: classification.b2b.len(),
            b2cs_count: classification.b2cs.len(),
            b2cl_count: classification.b2cl.len(),
            credit_notes_count: credit_notes.len(),
            credit_notes_total: credit_notes.iter().map(|cn| cn.total_amount.clone()).sum(),
            total_tax,
            grand_total: &b2b_total + &b2cs_total + &b2cl_total,
            b2b_total,
            b2cs_total,
            b2cl_total,
        }
    }
}
