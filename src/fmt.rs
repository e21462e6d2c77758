use rust_decimal::Decimal;

/// Format a Decimal as a dollar amount with thousands separators: $1,234.56
pub fn money(val: Decimal) -> String {
    let negative = val.is_sign_negative() && !val.is_zero();
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Plain two-decimal amount right-aligned in `width`, for summary columns.
pub fn column(val: Decimal, width: usize) -> String {
    format!("{:>width$}", format!("{val:.2}"))
}

/// Left-align `s` in `width` with dot leaders, the way the report pads
/// category codes and descriptions.
pub fn dot_pad(s: &str, width: usize) -> String {
    format!("{s:.<width$}")
}
