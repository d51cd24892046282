//! Issue an invoice and a credit note against an in-memory store, then print the
//! GSTR-1 upload for the month

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use gst_billing_core::{
    utils::{format_indian_currency, MemoryStorage},
    BillingConfig, CompanySettings, CreditNoteDraft, DocumentIssuer, FilingPeriod,
    InvoiceDraft, Item, LineItemInput, Party, PaymentTerms,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gst_billing_core=info".into()),
        )
        .init();

    let mut settings = CompanySettings::new("Acme Plastics Pvt Ltd", "07AAACA1234B1Z5", "07");
    settings.state = "Delhi".to_string();
    let storage = MemoryStorage::new(settings);
    let mut issuer = DocumentIssuer::new(storage).with_config(BillingConfig::load()?);

    let crate_item = Item {
        id: uuid::Uuid::new_v4(),
        name: "Plastic Crate 40L".to_string(),
        hsn_code: Some("3923".to_string()),
        default_unit: "Pcs".to_string(),
        default_rate: Some(BigDecimal::from_str("425.50")?),
        gst_rate: BigDecimal::from(18),
    };

    let mut buyer = Party::new("Patil Distributors");
    buyer.gstin = Some("27AAPFP1234C1Z9".to_string());
    buyer.state = Some("Maharashtra".to_string());
    buyer.state_code = Some("27".to_string());
    buyer.payment_terms = Some(PaymentTerms::Net15);

    let invoice_date = NaiveDate::from_ymd_opt(2024, 4, 5).ok_or("bad date")?;
    let mut draft = InvoiceDraft::for_party(&buyer, invoice_date)
        .add_line(LineItemInput::from_item(&crate_item, BigDecimal::from(120)))
        .add_line(LineItemInput::new(
            "Crate lids",
            BigDecimal::from(120),
            BigDecimal::from_str("35")?,
        ));
    draft.packaging_charges = BigDecimal::from(500);

    println!("🧾 Issuing invoice");
    let issued = issuer.issue_invoice(&draft).await?;
    let invoice = &issued.document;
    println!("  Number:        {}", invoice.reference());
    println!("  Taxable value: {}", format_indian_currency(&invoice.sub_total));
    println!("  IGST:          {}", format_indian_currency(&invoice.tax.igst_amount()));
    println!("  Grand total:   {}", format_indian_currency(&invoice.grand_total));
    println!("  In words:      {}", invoice.amount_in_words);
    println!("  Next number:   {}", issued.next_counter);
    println!();

    let note_date = NaiveDate::from_ymd_opt(2024, 4, 18).ok_or("bad date")?;
    let note = issuer
        .issue_credit_note(
            &CreditNoteDraft::against_invoice(invoice, note_date, "Damaged goods")
                .add_line(LineItemInput::from_item(&crate_item, BigDecimal::from(4))),
        )
        .await?;
    println!(
        "↩️  {} for {} ({})",
        note.document.reference(),
        format_indian_currency(&note.document.total_amount),
        note.document.reason
    );
    println!();

    let report = issuer.gstr1_report(FilingPeriod::new(2024, 4)?).await?;
    println!("📤 {}", report.file_name("json"));
    println!("{}", report.to_json(issuer.config())?);

    Ok(())
}
