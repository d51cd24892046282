//! Indian states and union territories with their GST state codes

pub const INDIAN_STATES: [(&str, &str); 36] = [
    ("01", "Jammu & Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("26", "Dadra & Nagar Haveli and Daman & Diu"),
    ("27", "Maharashtra"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman & Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("38", "Ladakh"),
];

/// State name for a two-digit GST state code
pub fn state_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    INDIAN_STATES
        .iter()
        .find(|(state_code, _)| *state_code == code)
        .map(|(_, name)| *name)
}

/// GST state code for a state name, case-insensitive
pub fn state_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    INDIAN_STATES
        .iter()
        .find(|(_, state_name)| state_name.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        assert_eq!(state_name("07"), Some("Delhi"));
        assert_eq!(state_name("25"), None);
        assert_eq!(state_code("maharashtra"), Some("27"));
    }
}
