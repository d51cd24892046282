//! Indian-English amount in words (Crore / Lakh / Thousand grouping)

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};

use crate::tax::gst::round_money;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

fn two_digits(num: u128) -> String {
    let num = num as usize;
    if num < 20 {
        return ONES[num].to_string();
    }
    let ten = TENS[num / 10];
    match num % 10 {
        0 => ten.to_string(),
        one => format!("{} {}", ten, ONES[one]),
    }
}

fn three_digits(num: u128) -> String {
    let hundred = num / 100;
    let rest = num % 100;
    if hundred == 0 {
        return two_digits(rest);
    }
    let mut words = format!("{} Hundred", ONES[hundred as usize]);
    if rest > 0 {
        words.push(' ');
        words.push_str(&two_digits(rest));
    }
    words
}

/// Words for a whole number using Indian grouping, without any currency suffix.
/// Crore counts of 100 or more are themselves spelled out recursively.
fn indian_number(num: u128) -> String {
    let crore = num / CRORE;
    let lakh = (num % CRORE) / LAKH;
    let thousand = (num % LAKH) / THOUSAND;
    let hundred = num % THOUSAND;

    let mut parts = Vec::new();
    if crore > 0 {
        let crore_words = if crore < 100 {
            two_digits(crore)
        } else {
            indian_number(crore)
        };
        parts.push(format!("{} Crore", crore_words));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", two_digits(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", two_digits(thousand)));
    }
    if hundred > 0 {
        parts.push(three_digits(hundred));
    }
    parts.join(" ")
}

/// Convert a rupee amount to words, e.g. `"One Lakh Rupees Only"`.
///
/// Paise are rounded half away from zero. Negative amounts are prefixed with
/// `"Minus "`.
pub fn amount_in_words(amount: &BigDecimal) -> String {
    // sub-paisa amounts of either sign read as zero
    let amount = &round_money(amount);
    if amount.is_zero() {
        return "Zero Rupees Only".to_string();
    }
    if *amount < BigDecimal::zero() {
        return format!("Minus {}", amount_in_words(&amount.abs()));
    }

    let whole = amount.with_scale_round(0, RoundingMode::Floor);
    let paise = ((amount - &whole) * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_u128()
        .unwrap_or(0);
    let Some(mut rupees) = whole.to_u128() else {
        return format!("{} Rupees Only", whole);
    };

    // 0.995 and friends round up into the next rupee
    let paise = if paise >= 100 {
        rupees += 1;
        paise - 100
    } else {
        paise
    };

    let mut words = String::new();
    if rupees > 0 {
        words.push_str(&indian_number(rupees));
        words.push_str(" Rupees");
    }
    if paise > 0 {
        if !words.is_empty() {
            words.push_str(" and ");
        }
        words.push_str(&two_digits(paise));
        words.push_str(" Paise");
    }
    if words.is_empty() {
        return "Zero Rupees Only".to_string();
    }

    words + " Only"
}
