/// Round an amount to whole cents
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Amounts closer than half a cent are treated as equal
pub fn is_zero(value: f64) -> bool {
    value.abs() < 0.005
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(10.005_1), 10.01);
        assert_eq!(round_money(1999.994), 1999.99);
        assert_eq!(round_money(-3.333), -3.33);
        assert!(is_zero(0.004));
        assert!(!is_zero(0.01));
    }
}
