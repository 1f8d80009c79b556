use serde::Serialize;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{abs:.2}");
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

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

/// Fixed-point string with two decimals, e.g. 263.636 -> "263.64".
pub fn fixed2(val: f64) -> String {
    format!("{val:.2}")
}

/// A category's share of a breakdown total.
///
/// Serialized as a fixed two-decimal string when the grand total is
/// positive, and as the bare numeral 0 when it is zero. Consumers depend
/// on that asymmetry, so it is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Percentage {
    Share(String),
    Zero(u8),
}

impl Percentage {
    pub fn of(amount: f64, total: f64) -> Self {
        if total > 0.0 {
            Percentage::Share(fixed2(amount / total * 100.0))
        } else {
            Percentage::Zero(0)
        }
    }

    /// Numeric value, for display and for the sum-to-100 property.
    pub fn value(&self) -> f64 {
        match self {
            Percentage::Share(s) => s.parse().unwrap_or(0.0),
            Percentage::Zero(_) => 0.0,
        }
    }
}

/// Long English month name for a 1-indexed calendar month. Fixed locale so
/// the aggregation output never depends on the host environment.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
    }

    #[test]
    fn test_fixed2_rounds_half_up() {
        assert_eq!(fixed2(263.6363636), "263.64");
        assert_eq!(fixed2(100.0), "100.00");
        assert_eq!(fixed2(0.005), "0.01");
    }

    #[test]
    fn test_percentage_is_string_when_total_positive() {
        let p = Percentage::of(100.0, 100.0);
        assert_eq!(p, Percentage::Share("100.00".to_string()));
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"100.00\"");
    }

    #[test]
    fn test_percentage_is_numeral_zero_when_total_zero() {
        let p = Percentage::of(0.0, 0.0);
        assert_eq!(p, Percentage::Zero(0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "0");
    }

    #[test]
    fn test_month_name_fixed_locale() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
