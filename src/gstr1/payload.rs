//! GSTR-1 JSON payload in the field names of the government filing schema

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::gstr1::classify::{B2csAggregate, SupplyType};
use crate::types::{BillingError, BillingResult, TaxComponents};

/// Root of the GSTR-1 upload file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Return {
    pub gstin: String,
    /// Filing period, `MMYYYY`
    pub fp: String,
    pub gt: Number,
    pub cur_gt: Number,
    pub b2b: Vec<B2bParty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub b2cl: Vec<B2clPlace>,
    pub b2cs: Vec<B2csEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cdnr: Vec<CdnrParty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2bParty {
    pub ctin: String,
    pub inv: Vec<B2bInvoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2bInvoice {
    pub inum: String,
    /// `dd-mm-yyyy`
    pub idt: String,
    pub val: Number,
    pub pos: String,
    /// `Y` or `N`
    pub rchrg: String,
    pub inv_typ: String,
    pub itms: Vec<ItemEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub num: u32,
    pub itm_det: ItemDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub txval: Number,
    pub rt: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iamt: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2clPlace {
    pub pos: String,
    pub inv: Vec<B2clInvoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2clInvoice {
    pub inum: String,
    pub idt: String,
    pub val: Number,
    pub itms: Vec<ItemEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2csEntry {
    pub sply_ty: String,
    pub pos: String,
    /// `OE`: not supplied through an e-commerce operator
    pub typ: String,
    pub txval: Number,
    pub rt: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iamt: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnrParty {
    pub ctin: String,
    pub nt: Vec<CreditNoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNoteEntry {
    /// `C` for credit notes
    pub ntty: String,
    pub nt_num: String,
    pub nt_dt: String,
    pub val: Number,
    pub pos: String,
    pub rchrg: String,
    pub inv_typ: String,
    pub itms: Vec<ItemEntry>,
}

/// Decimal amount as a JSON number: integral values print without a fraction
pub fn json_number(value: &BigDecimal) -> BillingResult<Number> {
    let normalized = value.normalized();
    if normalized.with_scale(0) == normalized {
        if let Some(integer) = normalized.to_i64() {
            return Ok(Number::from(integer));
        }
    }
    normalized
        .to_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| BillingError::Export(format!("amount {} is not representable in JSON", value)))
}

fn optional_number(value: &BigDecimal) -> BillingResult<Option<Number>> {
    if value.is_zero() {
        Ok(None)
    } else {
        json_number(value).map(Some)
    }
}

/// Single-item breakdown used by B2B, B2CL and credit note entries.
///
/// CGST and SGST are present together when CGST is non-zero; IGST when it is non-zero.
pub fn item_entries(
    taxable_value: &BigDecimal,
    rate: &BigDecimal,
    tax: &TaxComponents,
) -> BillingResult<Vec<ItemEntry>> {
    let cgst = tax.cgst_amount();
    let (camt, samt) = if cgst.is_zero() {
        (None, None)
    } else {
        (
            Some(json_number(&cgst)?),
            Some(json_number(&tax.sgst_amount())?),
        )
    };

    Ok(vec![ItemEntry {
        num: 1,
        itm_det: ItemDetail {
            txval: json_number(taxable_value)?,
            rt: json_number(rate)?,
            camt,
            samt,
            iamt: optional_number(&tax.igst_amount())?,
        },
    }])
}

impl B2csEntry {
    pub fn from_aggregate(aggregate: &B2csAggregate) -> BillingResult<Self> {
        let (camt, samt, iamt) = match aggregate.supply_type {
            SupplyType::Intra => (
                Some(json_number(&aggregate.cgst_amount)?),
                Some(json_number(&aggregate.sgst_amount)?),
                None,
            ),
            SupplyType::Inter => (None, None, Some(json_number(&aggregate.igst_amount)?)),
        };

        Ok(Self {
            sply_ty: aggregate.supply_type.to_string(),
            pos: aggregate.place_of_supply.clone(),
            typ: "OE".to_string(),
            txval: json_number(&aggregate.taxable_value)?,
            rt: json_number(&aggregate.rate)?,
            camt,
            samt,
            iamt,
        })
    }
}
