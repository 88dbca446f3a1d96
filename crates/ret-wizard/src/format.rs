//! Display formatting for currency and percentage outputs, pl-PL style.

/// Format a PLN amount with grouped thousands and no decimals: `2 400 zł`.
pub fn pln(value: f64) -> String {
    let rounded = value.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped} zł")
    } else {
        format!("{grouped} zł")
    }
}

/// Format a whole percentage: `48%`.
pub fn percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pln_groups_thousands() {
        assert_eq!(pln(2400.0), "2 400 zł");
        assert_eq!(pln(444_000.4), "444 000 zł");
        assert_eq!(pln(1_234_567.0), "1 234 567 zł");
        assert_eq!(pln(999.6), "1 000 zł");
        assert_eq!(pln(0.0), "0 zł");
        assert_eq!(pln(-1500.0), "-1 500 zł");
    }

    #[test]
    fn percent_rounds_to_whole() {
        assert_eq!(percent(48.0), "48%");
        assert_eq!(percent(47.6), "48%");
    }
}
