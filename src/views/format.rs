use chrono::{DateTime, Utc};

/// Menu and order price: `₹299`, or `₹299.50` when there is a fractional part.
pub fn rupees(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("₹{}", amount as i64)
    } else {
        format!("₹{:.2}", amount)
    }
}

/// Revenue figure rounded to whole rupees with thousands separators: `₹12,345`.
pub fn rupees_grouped(amount: f64) -> String {
    format!("₹{}", thousands(amount.round() as i64))
}

pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `DD/MM/YYYY HH:MM` in UTC. Values that do not parse are shown as stored.
pub fn timestamp(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc).format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_prices_have_no_decimals() {
        assert_eq!(rupees(299.0), "₹299");
        assert_eq!(rupees(0.0), "₹0");
        assert_eq!(rupees(149.5), "₹149.50");
    }

    #[test]
    fn revenue_is_grouped_by_thousands() {
        assert_eq!(rupees_grouped(0.0), "₹0");
        assert_eq!(rupees_grouped(999.0), "₹999");
        assert_eq!(rupees_grouped(1000.0), "₹1,000");
        assert_eq!(rupees_grouped(1234567.4), "₹1,234,567");
        assert_eq!(thousands(-12345), "-12,345");
    }

    #[test]
    fn timestamps_render_day_first() {
        assert_eq!(timestamp("2026-10-19T08:05:00.000Z"), "19/10/2026 08:05");
        assert_eq!(timestamp("2026-10-19T08:05:00.000+05:30"), "19/10/2026 02:35");
        assert_eq!(timestamp("yesterday"), "yesterday");
    }
}
