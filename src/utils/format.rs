//! Display formatting for amounts and dates

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use crate::tax::round_money;

/// Indian-style currency, e.g. `₹1,23,456.00`: the last three digits, then
/// groups of two.
pub fn format_indian_currency(amount: &BigDecimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded < BigDecimal::zero();
    let text = rounded.abs().with_scale(2).to_string();
    let (rupees, paise) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = if rupees.len() <= 3 {
        rupees.to_string()
    } else {
        let (head, last_three) = rupees.split_at(rupees.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut remaining = head;
        while remaining.len() > 2 {
            let (rest, group) = remaining.split_at(remaining.len() - 2);
            groups.push(group);
            remaining = rest;
        }
        groups.push(remaining);
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    };

    format!("₹{}{}.{}", if negative { "-" } else { "" }, grouped, paise)
}

/// GST portal date format, `dd-mm-yyyy`
pub fn gstr_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn format(value: &str) -> String {
        format_indian_currency(&BigDecimal::from_str(value).unwrap())
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format("123456"), "₹1,23,456.00");
        assert_eq!(format("12345678.5"), "₹1,23,45,678.50");
        assert_eq!(format("999"), "₹999.00");
        assert_eq!(format("1000"), "₹1,000.00");
        assert_eq!(format("-2500.75"), "₹-2,500.75");
    }

    #[test]
    fn test_gstr_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        assert_eq!(gstr_date(date), "05-04-2024");
    }
}
