/// Divides an exact total by a count. Returns `None` when `count` is zero.
///
/// Callers accumulate totals as integers so the mean does not depend on
/// input order.
pub fn mean_of_total(total: u128, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total as f64 / count as f64)
}

/// Fraction of `total` represented by `part`. Returns `None` when `total` is zero.
pub fn share(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_none() {
        assert_eq!(mean_of_total(10, 0), None);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean_of_total(10, 4), Some(2.5));
        let total = u64::MAX as u128 * 2;
        assert_eq!(mean_of_total(total, 2), Some(u64::MAX as f64));
    }

    #[test]
    fn test_share() {
        assert_eq!(share(10, 0), None);
        assert_eq!(share(1, 4), Some(0.25));
        assert_eq!(share(6, 10), Some(0.6));
    }
}
