//! # GST Billing Core
//!
//! The computation core of a small-business GST billing application: invoices,
//! credit notes, payments and the GSTR-1 return.
//!
//! ## Features
//!
//! - **Tax computation**: CGST/SGST for intra-state and IGST for inter-state supplies,
//!   rounded to paise at every step
//! - **Amount in words**: Indian numbering (Crore, Lakh, Thousand)
//! - **Document numbering**: per-kind counters with drafts, backfilled numbers and
//!   duplicate detection
//! - **Receivables**: party ledgers with running balance, payment status, aging buckets
//! - **GSTR-1**: B2B / B2CS / B2CL classification, filing JSON and CSV export
//! - **Storage abstraction**: any record store can implement [`BillingStore`]
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_billing_core::{compute_tax, TaxInput, TaxLine};
//! use bigdecimal::BigDecimal;
//!
//! let breakdown = compute_tax(&TaxInput {
//!     lines: vec![TaxLine::new(BigDecimal::from(10), BigDecimal::from(100))],
//!     packaging_charges: BigDecimal::from(0),
//!     supplier_state_code: "07".to_string(),
//!     counterparty_state_code: "07".to_string(),
//!     default_gst_rate: BigDecimal::from(18),
//! })
//! .unwrap();
//!
//! assert_eq!(breakdown.grand_total, BigDecimal::from(1180));
//! assert_eq!(breakdown.amount_in_words, "One Thousand One Hundred Eighty Rupees Only");
//! ```

pub mod config;
pub mod document;
pub mod gstr1;
pub mod issuer;
pub mod ledger;
pub mod numbering;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use crate::config::BillingConfig;
pub use document::*;
pub use gstr1::{FilingPeriod, Gstr1Report, Gstr1Return, Gstr1Summary};
pub use issuer::*;
pub use ledger::*;
pub use numbering::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
