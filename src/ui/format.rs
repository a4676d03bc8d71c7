/// Format `value` with `decimals` fraction digits and `,` thousands separators.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    // `-0` rounds away to "0", so only mark values that keep a digit.
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `$12,345` style amount with no decimals.
pub fn currency(value: f64) -> String {
    format!("${}", thousands(value, 0))
}

/// Amount expressed in millions with two decimals.
pub fn millions(value: f64) -> String {
    thousands(value / 1_000_000.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0.0, 0), "0");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(thousands(-52500.4, 0), "-52,500");
        assert_eq!(thousands(-0.2, 0), "0");
    }

    #[test]
    fn currency_and_millions() {
        assert_eq!(currency(100.0), "$100");
        assert_eq!(currency(10.0), "$10");
        assert_eq!(currency(1_999_999.6), "$2,000,000");
        assert_eq!(millions(2_345_678.0), "2.35");
    }
}
