//! Monetary normalization and BRL formatting.
//!
//! Values are carried as integer centavos so the two-decimal quantization is
//! exact regardless of locale in the input text.

/// Parse a free-form monetary string into centavos.
///
/// Everything outside `[0-9,.-]` is stripped first. When both `.` and `,`
/// occur, the rightmost one is taken as the decimal separator and the other
/// as a thousands separator. A lone `,` is a pt-BR decimal separator; a lone
/// `.` is already a decimal point.
pub fn normalize_money(text: &str) -> Option<i64> {
    let s: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if s.is_empty() {
        return None;
    }

    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');

    let cleaned = match (last_dot, last_comma) {
        (Some(d), Some(c)) => {
            let (decimal, thousands) = if d > c { ('.', ',') } else { (',', '.') };
            s.replace(thousands, "").replace(decimal, ".")
        }
        (None, Some(_)) => s.replace(',', "."),
        _ => s,
    };

    parse_decimal_centavos(&cleaned)
}

/// Parse `-?\d+(\.\d+)?` into centavos, rounding the third fractional digit
/// half away from zero.
fn parse_decimal_centavos(s: &str) -> Option<i64> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() || digits.contains('-') {
        return None;
    }

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let mut frac = frac_part.to_string();
    while frac.len() < 3 {
        frac.push('0');
    }
    let head: i64 = frac[..2].parse().ok()?;
    let round_up = frac.as_bytes()[2] >= b'5';

    let mut centavos = whole.checked_mul(100)? + head + i64::from(round_up);
    if neg {
        centavos = -centavos;
    }
    Some(centavos)
}

/// Format centavos as `R$ 1.234,56` (thousands dot, decimal comma, sign
/// before the currency symbol).
pub fn format_brl(centavos: i64) -> String {
    let neg = centavos < 0;
    let abs = centavos.unsigned_abs();
    let whole = abs / 100;
    let cents = abs % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}R$ {},{:02}", if neg { "-" } else { "" }, grouped, cents)
}

/// Convenience for values arriving as floating reais (JSON input).
pub fn reais_to_centavos(value: f64) -> i64 {
    (value * 100.0).round() as i64
}
