//! Party ledger, payment status and aging for a customer with a few invoices

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use gst_billing_core::{
    utils::{format_indian_currency, MemoryStorage},
    CompanySettings, DocumentIssuer, InvoiceDraft, LineItemInput, Party, Payment, PaymentMode,
    PaymentTerms,
};

fn date(month: u32, day: u32) -> Result<NaiveDate, &'static str> {
    NaiveDate::from_ymd_opt(2024, month, day).ok_or("bad date")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let storage = MemoryStorage::new(CompanySettings::new(
        "Acme Plastics Pvt Ltd",
        "07AAACA1234B1Z5",
        "07",
    ));
    let mut issuer = DocumentIssuer::new(storage);

    let mut party = Party::new("Sharma Traders");
    party.state = Some("Delhi".to_string());
    party.state_code = Some("07".to_string());
    party.payment_terms = Some(PaymentTerms::Net30);

    let mut invoice_ids = Vec::new();
    for (month, day, quantity) in [(3, 2, 40), (4, 11, 25), (5, 20, 60)] {
        let draft = InvoiceDraft::for_party(&party, date(month, day)?).add_line(
            LineItemInput::new("Storage bin", BigDecimal::from(quantity), BigDecimal::from(180)),
        );
        invoice_ids.push(issuer.issue_invoice(&draft).await?.document.id);
    }

    let mut neft = Payment::new(invoice_ids[0], date(4, 1)?, BigDecimal::from(8496), PaymentMode::BankTransfer);
    neft.reference_number = Some("NEFT-55120".to_string());
    issuer.record_payment(neft).await?;
    issuer
        .record_payment(Payment::new(invoice_ids[1], date(5, 25)?, BigDecimal::from(2000), PaymentMode::Upi))
        .await?;

    let today = date(6, 30)?;
    let ledger = issuer.party_ledger(party.id, today).await?;

    println!("📒 Ledger for {}", party.name);
    println!("{:<12} {:<12} {:<36} {:>14} {:>14} {:>14}", "Date", "Ref", "Description", "Debit", "Credit", "Balance");
    for entry in &ledger.entries {
        println!(
            "{:<12} {:<12} {:<36} {:>14} {:>14} {:>14}",
            entry.date,
            entry.reference,
            entry.description,
            format_indian_currency(&entry.debit),
            format_indian_currency(&entry.credit),
            format_indian_currency(&entry.balance),
        );
    }
    println!();

    for status in &ledger.invoices {
        println!(
            "  {} {} paid of {}: {}",
            status.reference,
            format_indian_currency(&status.paid),
            format_indian_currency(&status.grand_total),
            status.status
        );
    }
    println!();

    let aging = issuer.aging_report(today).await?;
    println!("⏳ Aging as of {}", aging.as_of);
    for bucket in &aging.buckets {
        println!(
            "  {:<12} {:>14} ({} invoices)",
            bucket.bucket.label(),
            format_indian_currency(&bucket.total),
            bucket.invoices.len()
        );
    }
    println!("  {:<12} {:>14}", "Total", format_indian_currency(&aging.grand_total));

    Ok(())
}
