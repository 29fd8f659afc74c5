//! Phone Number Normalization
//!
//! Canonicalizes raw phone input into an E.164-style number. Spanish
//! 9-digit numbers are the common case, so +34 is the default country
//! prefix; any number that already carries an explicit prefix keeps it.
//! The function is total (never fails) and idempotent.

pub fn normalize_phone(raw: &str) -> String {
    let had_plus = raw.trim_start().starts_with('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix("0034") {
        return format!("+34{rest}");
    }
    if digits.starts_with("34") && digits.len() > 9 {
        return format!("+{digits}");
    }
    if let Some(rest) = digits.strip_prefix('0') {
        return format!("+34{rest}");
    }
    if digits.len() == 9 && !digits.starts_with("34") {
        return format!("+34{digits}");
    }
    if had_plus {
        return format!("+{digits}");
    }
    format!("+34{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_nine_digit_spanish_number() {
        assert_eq!(normalize_phone("612345678"), "+34612345678");
    }

    #[test]
    fn international_zero_zero_prefix() {
        assert_eq!(normalize_phone("0034612345678"), "+34612345678");
    }

    #[test]
    fn explicit_plus_is_preserved() {
        assert_eq!(normalize_phone("+1 5551234"), "+15551234");
    }

    #[test]
    fn spain_prefix_without_plus() {
        assert_eq!(normalize_phone("34612345678"), "+34612345678");
    }

    #[test]
    fn leading_zero_is_dropped() {
        assert_eq!(normalize_phone("0612345678"), "+34612345678");
    }

    #[test]
    fn separators_are_stripped() {
        assert_eq!(normalize_phone("612 34 56 78"), "+34612345678");
        assert_eq!(normalize_phone("612-345-678"), "+34612345678");
    }

    #[test]
    fn idempotent_on_varied_inputs() {
        for input in [
            "612345678",
            "0034612345678",
            "+1 5551234",
            "34612345678",
            "0612345678",
            "+34 612 345 678",
            "garbage",
            "",
        ] {
            let once = normalize_phone(input);
            assert_eq!(normalize_phone(&once), once, "input: {input:?}");
        }
    }
}
