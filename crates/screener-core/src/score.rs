/// Clamp a raw additive score into the 0..=100 band.
pub fn clamp_score(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0)
}

/// Round to one decimal, the precision persisted scores carry.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map a 0..=100 score onto five labels at the shared 70/55/45/30 cutoffs.
///
/// `labels` runs strongest-positive first: `[>=70, >=55, >=45, >=30, below]`.
pub fn five_band_label(score: f64, labels: [&'static str; 5]) -> &'static str {
    if score >= 70.0 {
        labels[0]
    } else if score >= 55.0 {
        labels[1]
    } else if score >= 45.0 {
        labels[2]
    } else if score >= 30.0 {
        labels[3]
    } else {
        labels[4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 5] = ["A", "B", "C", "D", "E"];

    #[test]
    fn clamps_both_ends() {
        assert_eq!(clamp_score(-12.0), 0.0);
        assert_eq!(clamp_score(131.0), 100.0);
        assert_eq!(clamp_score(55.5), 55.5);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round1(59.25), 59.3);
        assert_eq!(round1(59.24), 59.2);
        assert_eq!(round1(-0.05), -0.1);
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(five_band_label(70.0, LABELS), "A");
        assert_eq!(five_band_label(69.9, LABELS), "B");
        assert_eq!(five_band_label(55.0, LABELS), "B");
        assert_eq!(five_band_label(45.0, LABELS), "C");
        assert_eq!(five_band_label(30.0, LABELS), "D");
        assert_eq!(five_band_label(29.9, LABELS), "E");
    }
}
