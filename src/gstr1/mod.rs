//! GSTR-1 outward supplies return: classification, JSON payload and CSV export

pub mod classify;
pub mod export;
pub mod payload;
pub mod summary;

pub use classify::*;
pub use export::*;
pub use payload::*;
pub use summary::*;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BillingConfig;
use crate::utils::format::gstr_date;
use crate::types::*;

/// Calendar month a return is filed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilingPeriod {
    pub year: i32,
    pub month: u32,
}

impl FilingPeriod {
    pub fn new(year: i32, month: u32) -> BillingResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(BillingError::Validation(format!(
                "Invalid filing month: {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Period containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Period code as filed, `MMYYYY`
    pub fn fp(&self) -> String {
        format!("{:02}{}", self.month, self.year)
    }
}

/// Everything filed for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Report {
    pub period: FilingPeriod,
    pub company_gstin: String,
    pub company_state_code: String,
    pub classification: Gstr1Classification,
    /// Final credit notes dated within the period
    pub credit_notes: Vec<CreditNote>,
    pub b2cs_aggregates: Vec<B2csAggregate>,
    pub summary: Gstr1Summary,
}

impl Gstr1Report {
    /// Build the return from all invoices and credit notes; documents outside the
    /// period and unnumbered drafts are skipped.
    pub fn build(
        invoices: &[Invoice],
        credit_notes: &[CreditNote],
        settings: &CompanySettings,
        period: FilingPeriod,
        config: &BillingConfig,
    ) -> Self {
        let company_state_code = config.company_state_code(&settings.state_code).to_string();

        let in_period: Vec<Invoice> = invoices
            .iter()
            .filter(|inv| !inv.is_draft && inv.invoice_number.is_some())
            .filter(|inv| period.contains(inv.invoice_date))
            .cloned()
            .collect();
        let credit_notes: Vec<CreditNote> = credit_notes
            .iter()
            .filter(|cn| !cn.is_draft && cn.credit_note_number.is_some())
            .filter(|cn| period.contains(cn.credit_note_date))
            .cloned()
            .collect();

        let classification = classify(&in_period, &company_state_code, config);
        let b2cs_aggregates = aggregate_b2cs(&classification.b2cs, &company_state_code, config);
        let summary = Gstr1Summary::new(&classification, &credit_notes);

        debug!(
            fp = %period.fp(),
            invoices = summary.total_invoices,
            credit_notes = summary.credit_notes_count,
            "built GSTR-1 report"
        );

        Self {
            period,
            company_gstin: settings.gstin.clone(),
            company_state_code,
            classification,
            credit_notes,
            b2cs_aggregates,
            summary,
        }
    }

    fn pos_or_company(&self, state_code: Option<&str>) -> String {
        place_of_supply(state_code, &self.company_state_code).to_string()
    }

    /// JSON payload for the filing portal
    pub fn to_payload(&self, config: &BillingConfig) -> BillingResult<Gstr1Return> {
        let fallback = &config.fallback_gst_rate;
        let grand_total = json_number(&self.summary.grand_total)?;

        let mut b2b = Vec::new();
        for (ctin, invoices) in group_by_key(&self.classification.b2b, |inv| {
            inv.party_gstin.clone().unwrap_or_default()
        }) {
            let inv = invoices
                .into_iter()
                .map(|inv| {
                    Ok(B2bInvoice {
                        inum: document_number(inv.invoice_number),
                        idt: gstr_date(inv.invoice_date),
                        val: json_number(&inv.grand_total)?,
                        pos: self.pos_or_company(inv.place_of_supply_state_code.as_deref()),
                        rchrg: if inv.reverse_charge { "Y" } else { "N" }.to_string(),
                        inv_typ: "R".to_string(),
                        itms: item_entries(
                            &inv.sub_total,
                            &effective_rate(&inv.tax, fallback),
                            &inv.tax,
                        )?,
                    })
                })
                .collect::<BillingResult<Vec<_>>>()?;
            b2b.push(B2bParty { ctin, inv });
        }

        let mut b2cl = Vec::new();
        for (pos, invoices) in group_by_key(&self.classification.b2cl, |inv| {
            self.pos_or_company(inv.place_of_supply_state_code.as_deref())
        }) {
            let inv = invoices
                .into_iter()
                .map(|inv| {
                    Ok(B2clInvoice {
                        inum: document_number(inv.invoice_number),
                        idt: gstr_date(inv.invoice_date),
                        val: json_number(&inv.grand_total)?,
                        itms: item_entries(
                            &inv.sub_total,
                            &effective_rate(&inv.tax, fallback),
                            &inv.tax,
                        )?,
                    })
                })
                .collect::<BillingResult<Vec<_>>>()?;
            b2cl.push(B2clPlace { pos, inv });
        }

        let b2cs = self
            .b2cs_aggregates
            .iter()
            .map(B2csEntry::from_aggregate)
            .collect::<BillingResult<Vec<_>>>()?;

        let registered_notes = self
            .credit_notes
            .iter()
            .filter(|cn| cn.party_gstin.as_deref().is_some_and(|g| !g.trim().is_empty()));
        let mut cdnr = Vec::new();
        for (ctin, notes) in group_by_key(registered_notes, |cn| {
            cn.party_gstin.clone().unwrap_or_default()
        }) {
            let nt = notes
                .into_iter()
                .map(|cn| {
                    Ok(CreditNoteEntry {
                        ntty: "C".to_string(),
                        nt_num: cn.reference(),
                        nt_dt: gstr_date(cn.credit_note_date),
                        val: json_number(&cn.total_amount)?,
                        pos: self.pos_or_company(cn.party.state_code.as_deref()),
                        rchrg: "N".to_string(),
                        inv_typ: "R".to_string(),
                        itms: item_entries(
                            &cn.amount_before_tax,
                            &effective_rate(&cn.tax, fallback),
                            &cn.tax,
                        )?,
                    })
                })
                .collect::<BillingResult<Vec<_>>>()?;
            cdnr.push(CdnrParty { ctin, nt });
        }

        Ok(Gstr1Return {
            gstin: self.company_gstin.clone(),
            fp: self.period.fp(),
            gt: grand_total.clone(),
            cur_gt: grand_total,
            b2b,
            b2cl,
            b2cs,
            cdnr,
        })
    }

    /// Pretty-printed JSON upload file
    pub fn to_json(&self, config: &BillingConfig) -> BillingResult<String> {
        let payload = self.to_payload(config)?;
        serde_json::to_string_pretty(&payload).map_err(|e| BillingError::Export(e.to_string()))
    }

    /// Flat CSV of every document in the return
    pub fn to_csv(&self) -> BillingResult<String> {
        write_csv(&csv_rows(self))
    }

    /// Suggested download name, e.g. `GSTR1_04_2024.json`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "GSTR1_{:02}_{}.{}",
            self.period.month, self.period.year, extension
        )
    }
}

fn document_number(number: Option<u64>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}
