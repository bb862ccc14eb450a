//! Misc small utilities shared across modules.

/// Failure modes of [`parse_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// The argument did not resolve to a positive whole number.
    NotAnInteger,
    /// The resolved amount exceeds what the account actually has.
    NotEnough,
    /// The resolved amount is below the operation's minimum.
    PastMinimum,
    /// A fraction with a zero denominator.
    DivisionByZero,
}

/// Resolves a free-text amount against a total.
///
/// Supports `all`/`max`, `half`, percentages (`25%`), fractions (`1/3`),
/// shorthand suffixes (`1.5k`, `2m`, `1b`) and plain integers with optional
/// comma separators. Amounts above `maximum` clamp to `maximum`; amounts
/// above `total` or below `minimum` are errors.
pub fn parse_amount(
    total: i64,
    minimum: i64,
    maximum: i64,
    arg: &str,
) -> Result<i64, AmountError> {
    let arg = arg.trim().to_ascii_lowercase();

    // Halves round to even, so "half" of 5 is 2, not 3.
    let amount = if matches!(arg.as_str(), "all" | "max" | "a" | "m") {
        total
    } else if matches!(arg.as_str(), "half" | "h") {
        ((total as f64) / 2.0).round_ties_even() as i64
    } else if let Some(percent) = arg.strip_suffix('%') {
        let percent: f64 = percent.trim().parse().map_err(|_| AmountError::NotAnInteger)?;
        ((total as f64) * percent / 100.0).round_ties_even() as i64
    } else if let Some((numerator, denominator)) = arg.split_once('/') {
        let numerator: f64 = numerator.trim().parse().map_err(|_| AmountError::NotAnInteger)?;
        let denominator: f64 = denominator
            .trim()
            .parse()
            .map_err(|_| AmountError::NotAnInteger)?;
        if denominator == 0.0 {
            return Err(AmountError::DivisionByZero);
        }
        ((total as f64) * numerator / denominator).round_ties_even() as i64
    } else {
        parse_number(&arg)?
    };

    if amount > total {
        return Err(AmountError::NotEnough);
    }
    if amount <= 0 {
        return Err(AmountError::NotAnInteger);
    }
    if amount > maximum {
        return Ok(maximum);
    }
    if amount < minimum {
        return Err(AmountError::PastMinimum);
    }
    Ok(amount)
}

/// Parses `12,345`, `1.5k`, `2m`, `0.1b` or a plain integer.
fn parse_number(arg: &str) -> Result<i64, AmountError> {
    let cleaned: String = arg.chars().filter(|c| *c != ',').collect();

    let (digits, multiplier) = match cleaned.as_bytes().last() {
        Some(b'k') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some(b'm') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        Some(b'b') => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    if multiplier == 1.0 {
        return digits.parse().map_err(|_| AmountError::NotAnInteger);
    }

    let value: f64 = digits.parse().map_err(|_| AmountError::NotAnInteger)?;
    Ok((value * multiplier).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_fractions() {
        assert_eq!(parse_amount(1000, 1, 1000, "all"), Ok(1000));
        assert_eq!(parse_amount(1000, 1, 1000, "half"), Ok(500));
        assert_eq!(parse_amount(1000, 1, 1000, "25%"), Ok(250));
        assert_eq!(parse_amount(900, 1, 900, "1/3"), Ok(300));
        assert_eq!(
            parse_amount(1000, 1, 1000, "1/0"),
            Err(AmountError::DivisionByZero)
        );
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(parse_amount(5, 1, 5, "half"), Ok(2));
        assert_eq!(parse_amount(7, 1, 7, "half"), Ok(4));
        assert_eq!(parse_amount(5, 1, 5, "50%"), Ok(2));
        assert_eq!(parse_amount(5, 1, 5, "1/2"), Ok(2));
    }

    #[test]
    fn numbers_and_suffixes() {
        assert_eq!(parse_amount(10_000, 1, 10_000, "1,234"), Ok(1234));
        assert_eq!(parse_amount(10_000, 1, 10_000, "1.5k"), Ok(1500));
        assert_eq!(parse_amount(5_000_000, 1, 5_000_000, "2m"), Ok(2_000_000));
        assert_eq!(
            parse_amount(1000, 1, 1000, "seven"),
            Err(AmountError::NotAnInteger)
        );
    }

    #[test]
    fn bounds() {
        assert_eq!(parse_amount(100, 1, 100, "101"), Err(AmountError::NotEnough));
        assert_eq!(parse_amount(100, 1, 100, "0"), Err(AmountError::NotAnInteger));
        assert_eq!(parse_amount(100, 1, 50, "80"), Ok(50)); // clamps to maximum
        assert_eq!(
            parse_amount(100, 10, 100, "5"),
            Err(AmountError::PastMinimum)
        );
    }
}
