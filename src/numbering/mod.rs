//! Sequential document numbering
//!
//! Final invoices and credit notes take numbers from a per-kind counter kept in
//! [`CompanySettings`](crate::types::CompanySettings). The counter only moves
//! forward: backfilling an older number leaves it where it is, and drafts never
//! touch it.

use serde::{Deserialize, Serialize};

use crate::types::{BillingError, BillingResult, DocumentKind};

/// Outcome of allocating a number for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Number to print on the document; `None` for drafts
    pub assigned: Option<u64>,
    /// Counter value to persist once the document is saved
    pub next_counter: u64,
}

/// Allocate a number for a document.
///
/// `candidate` is the user-entered number; `None` takes the counter's value.
pub fn allocate_number(
    kind: DocumentKind,
    current_counter: u64,
    candidate: Option<u64>,
    is_draft: bool,
) -> BillingResult<Allocation> {
    if is_draft {
        return Ok(Allocation {
            assigned: None,
            next_counter: current_counter,
        });
    }

    let number = candidate.unwrap_or_else(|| current_counter.max(1));
    if number == 0 {
        return Err(BillingError::Validation(format!(
            "Please enter a valid {} number",
            kind.to_string().to_lowercase()
        )));
    }

    Ok(Allocation {
        assigned: Some(number),
        next_counter: counter_after(kind, current_counter, number)?,
    })
}

/// Counter value after issuing `number`: `number + 1` when it reached the
/// counter, otherwise unchanged.
pub fn counter_after(kind: DocumentKind, current_counter: u64, number: u64) -> BillingResult<u64> {
    if number < current_counter {
        return Ok(current_counter);
    }
    number.checked_add(1).ok_or_else(|| {
        BillingError::Validation(format!("{} number {} is too large", kind, number))
    })
}
