//! Display formatting helpers
//!
//! Reference-locale numeric formatting: thousands separated by spaces,
//! comma as the decimal separator.

/// Format a price for display. The value is rounded to whole units but
/// always shown with two decimals.
///
/// # Examples
///
/// ```
/// use uniq_client::format::format_price;
///
/// assert_eq!(format_price(48652.4), "48 652,00");
/// assert_eq!(format_price(9.99), "10,00");
/// assert_eq!(format_price(0.0), "0,00");
/// ```
pub fn format_price(value: f64) -> String {
    let (int, frac) = format_price_parts(value);
    format!("{}{}", int, frac)
}

/// Format a price split into integer and fraction parts, for styling
/// them differently.
///
/// # Examples
///
/// ```
/// use uniq_client::format::format_price_parts;
///
/// let (int, frac) = format_price_parts(48652.4);
/// assert_eq!(int, "48 652");
/// assert_eq!(frac, ",00");
/// ```
pub fn format_price_parts(value: f64) -> (String, String) {
    let rounded = value.round() as i64;
    (group_thousands(rounded), ",00".to_string())
}

/// Format a rating as "x.x/5".
///
/// # Examples
///
/// ```
/// use uniq_client::format::format_rating;
///
/// assert_eq!(format_rating(4.31), "4.3/5");
/// assert_eq!(format_rating(0.0), "0.0/5");
/// ```
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}/5", rating)
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    let lead = digits.len() % 3;
    if lead > 0 {
        grouped.push_str(&digits[..lead]);
    }
    for (i, chunk) in digits[lead..].as_bytes().chunks(3).enumerate() {
        if lead > 0 || i > 0 {
            grouped.push(' ');
        }
        grouped.push_str(std::str::from_utf8(chunk).unwrap());
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
