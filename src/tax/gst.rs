//! GST (Goods and Services Tax) calculation engine for Indian tax compliance

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Serialize};

use crate::tax::words::amount_in_words;
use crate::types::{BillingError, BillingResult, TaxComponents};

/// Round a monetary value to paise, half away from zero
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Line amount as printed: `round(quantity * rate, 2)`
pub fn line_amount(quantity: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    round_money(&(quantity * rate))
}

/// GST rate structure for Indian taxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    /// Total GST rate percentage (e.g., 18 for 18%)
    pub total_rate: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
}

impl GstRate {
    /// Split the total rate into equal CGST and SGST halves
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::zero(),
        }
    }

    /// Apply the whole rate as IGST
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            total_rate: total_rate.clone(),
            cgst_rate: BigDecimal::zero(),
            sgst_rate: BigDecimal::zero(),
            igst_rate: total_rate,
        }
    }

    /// Pick the structure from the supply direction
    pub fn for_supply(total_rate: BigDecimal, is_inter_state: bool) -> Self {
        if is_inter_state {
            Self::inter_state(total_rate)
        } else {
            Self::intra_state(total_rate)
        }
    }

    /// Validate that the GST rate structure is correct
    pub fn validate(&self) -> Result<(), GstError> {
        if self.total_rate < BigDecimal::zero() || self.total_rate > BigDecimal::from(100) {
            return Err(GstError::InvalidRate(format!(
                "GST rate must be between 0 and 100, got {}",
                self.total_rate
            )));
        }

        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;
        if calculated_total != self.total_rate {
            return Err(GstError::InvalidRate(format!(
                "GST components don't add up to total rate: {} != {}",
                calculated_total, self.total_rate
            )));
        }

        if self.igst_rate.is_zero() && self.cgst_rate != self.sgst_rate {
            return Err(GstError::InvalidRate(
                "CGST and SGST rates must be equal for intra-state transactions".to_string(),
            ));
        }

        if self.igst_rate > BigDecimal::zero()
            && (self.cgst_rate > BigDecimal::zero() || self.sgst_rate > BigDecimal::zero())
        {
            return Err(GstError::InvalidRate(
                "Only IGST should be applicable for inter-state transactions".to_string(),
            ));
        }

        Ok(())
    }
}

/// Standard GST slabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    /// Exempt / nil-rated - 0%
    Essential,
    /// 5%
    Reduced,
    /// 12%
    Standard,
    /// 18%
    Higher,
    /// 28%
    Luxury,
}

impl GstCategory {
    pub const ALL: [GstCategory; 5] = [
        GstCategory::Essential,
        GstCategory::Reduced,
        GstCategory::Standard,
        GstCategory::Higher,
        GstCategory::Luxury,
    ];

    /// Get the standard GST rate for this category
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstCategory::Essential => BigDecimal::from(0),
            GstCategory::Reduced => BigDecimal::from(5),
            GstCategory::Standard => BigDecimal::from(12),
            GstCategory::Higher => BigDecimal::from(18),
            GstCategory::Luxury => BigDecimal::from(28),
        }
    }

    /// Find the slab matching a rate, if it is a standard one
    pub fn from_rate(rate: &BigDecimal) -> Option<Self> {
        Self::ALL.into_iter().find(|category| &category.rate() == rate)
    }
}

/// One line as seen by the tax engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub quantity: BigDecimal,
    pub rate: BigDecimal,
    /// GST rate of the catalog item this line references, if any
    pub item_gst_rate: Option<BigDecimal>,
}

impl TaxLine {
    pub fn new(quantity: BigDecimal, rate: BigDecimal) -> Self {
        Self {
            quantity,
            rate,
            item_gst_rate: None,
        }
    }

    pub fn with_item_rate(mut self, gst_rate: BigDecimal) -> Self {
        self.item_gst_rate = Some(gst_rate);
        self
    }
}

/// Everything needed to compute a document's tax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxInput {
    pub lines: Vec<TaxLine>,
    /// Only invoices carry packaging; credit notes pass zero
    pub packaging_charges: BigDecimal,
    pub supplier_state_code: String,
    pub counterparty_state_code: String,
    /// Used when no line references a catalog item with its own rate
    pub default_gst_rate: BigDecimal,
}

impl TaxInput {
    /// Reject malformed numbers before they reach the engine
    pub fn validate(&self) -> BillingResult<()> {
        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity < BigDecimal::zero() {
                return Err(BillingError::Computation(format!(
                    "Line {} has a negative quantity",
                    index + 1
                )));
            }
            if line.rate < BigDecimal::zero() {
                return Err(BillingError::Computation(format!(
                    "Line {} has a negative rate",
                    index + 1
                )));
            }
            if let Some(gst_rate) = &line.item_gst_rate {
                validate_rate_percent(gst_rate)?;
            }
        }

        if self.packaging_charges < BigDecimal::zero() {
            return Err(BillingError::Computation(
                "Packaging charges cannot be negative".to_string(),
            ));
        }

        validate_rate_percent(&self.default_gst_rate)
    }
}

fn validate_rate_percent(rate: &BigDecimal) -> BillingResult<()> {
    if *rate < BigDecimal::zero() || *rate > BigDecimal::from(100) {
        return Err(BillingError::Computation(format!(
            "GST rate must be between 0 and 100, got {}",
            rate
        )));
    }
    Ok(())
}

/// Computed tax figures for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub amount_before_tax: BigDecimal,
    pub sub_total: BigDecimal,
    pub gst_rate: GstRate,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    pub grand_total: BigDecimal,
    pub amount_in_words: String,
}

impl TaxBreakdown {
    pub fn is_inter_state(&self) -> bool {
        self.gst_rate.igst_rate > BigDecimal::zero()
    }

    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }

    /// Components as stored on a document; a 0% rate stores no tax at all
    pub fn components(&self) -> TaxComponents {
        if self.gst_rate.total_rate.is_zero() {
            TaxComponents::Nil
        } else if self.is_inter_state() {
            TaxComponents::Inter {
                igst_rate: self.gst_rate.igst_rate.clone(),
                igst_amount: self.igst_amount.clone(),
            }
        } else {
            TaxComponents::Intra {
                cgst_rate: self.gst_rate.cgst_rate.clone(),
                cgst_amount: self.cgst_amount.clone(),
                sgst_rate: self.gst_rate.sgst_rate.clone(),
                sgst_amount: self.sgst_amount.clone(),
            }
        }
    }
}

/// Whole-document rate: the first line that references a catalog rate wins.
///
/// A document mixing items at different rates is taxed entirely at that first
/// rate.
pub fn resolve_gst_rate(lines: &[TaxLine], default_rate: &BigDecimal) -> BigDecimal {
    lines
        .iter()
        .find_map(|line| line.item_gst_rate.clone())
        .unwrap_or_else(|| default_rate.clone())
}

/// Intra-state when both parties sit in the same state
pub fn is_inter_state(supplier_state_code: &str, counterparty_state_code: &str) -> bool {
    supplier_state_code.trim() != counterparty_state_code.trim()
}

/// Place of supply for an invoice: explicit place of supply, then billed-to state,
/// then the company's own state
pub fn invoice_supply_state<'a>(
    place_of_supply_state_code: Option<&'a str>,
    billed_to_state_code: Option<&'a str>,
    company_state_code: &'a str,
) -> &'a str {
    place_of_supply_state_code
        .filter(|code| !code.trim().is_empty())
        .or(billed_to_state_code.filter(|code| !code.trim().is_empty()))
        .unwrap_or(company_state_code)
}

/// Place of supply for a credit note: the party's state, then the company's
pub fn credit_note_supply_state<'a>(
    party_state_code: Option<&'a str>,
    company_state_code: &'a str,
) -> &'a str {
    party_state_code
        .filter(|code| !code.trim().is_empty())
        .unwrap_or(company_state_code)
}

/// Compute the full tax breakdown for a document.
///
/// Every monetary step is rounded to paise as it is produced: each line amount,
/// each tax component and the grand total.
pub fn compute_tax(input: &TaxInput) -> BillingResult<TaxBreakdown> {
    input.validate()?;

    let amount_before_tax: BigDecimal = input
        .lines
        .iter()
        .map(|line| line_amount(&line.quantity, &line.rate))
        .sum();
    let sub_total = round_money(&(&amount_before_tax + &input.packaging_charges));

    let total_rate = resolve_gst_rate(&input.lines, &input.default_gst_rate);
    let inter_state = is_inter_state(&input.supplier_state_code, &input.counterparty_state_code);
    let gst_rate = GstRate::for_supply(total_rate, inter_state);
    gst_rate
        .validate()
        .map_err(|e| BillingError::Computation(e.to_string()))?;

    let hundred = BigDecimal::from(100);
    let cgst_amount = round_money(&(&sub_total * &gst_rate.cgst_rate / &hundred));
    let sgst_amount = round_money(&(&sub_total * &gst_rate.sgst_rate / &hundred));
    let igst_amount = round_money(&(&sub_total * &gst_rate.igst_rate / &hundred));

    let grand_total = round_money(&(&sub_total + &cgst_amount + &sgst_amount + &igst_amount));
    let amount_in_words = amount_in_words(&grand_total);

    tracing::debug!(
        %sub_total,
        rate = %gst_rate.total_rate,
        inter_state,
        %grand_total,
        "computed GST breakdown"
    );

    Ok(TaxBreakdown {
        amount_before_tax,
        sub_total,
        gst_rate,
        cgst_amount,
        sgst_amount,
        igst_amount,
        grand_total,
        amount_in_words,
    })
}

/// GST-related errors
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
}
