//! Trend computation for school metrics.
//!
//! Pure helpers that turn a raw delta plus the current value into a
//! directional indicator, a formatted absolute change, and a percentage
//! change that is withheld when the denominator is too small to be
//! meaningful.

/// Deltas with a magnitude below this are displayed as no change. Absorbs
/// floating-point noise around true zero.
const FLAT_THRESHOLD: f64 = 0.05;

/// Direction of a metric's movement over a look-back period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Classify a delta. Flat within ±[`FLAT_THRESHOLD`], otherwise by sign.
    pub fn from_delta(delta: f64) -> Self {
        if delta.abs() < FLAT_THRESHOLD {
            TrendDirection::Flat
        } else if delta > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        }
    }

    /// Arrow glyph used next to trend values.
    pub fn arrow(self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Flat => "→",
        }
    }
}

/// Classification of a metric value, governing display formatting and the
/// percentage suppression threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Count,
    Score,
    Percentage,
}

impl MetricKind {
    /// Minimum current-value magnitude below which a percentage change is
    /// withheld. A small absolute change on a tiny denominator produces an
    /// exaggerated percentage with no interpretive value.
    pub fn suppression_threshold(self) -> f64 {
        match self {
            MetricKind::Count => 50.0,
            MetricKind::Score => 10.0,
            MetricKind::Percentage => 5.0,
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format an absolute change with an explicit sign and unit.
///
/// The delta is rounded to one decimal first; a rounded value of zero
/// renders as `"0 <unit>"` with no sign, whole numbers drop the decimal.
pub fn format_change(delta: f64, unit: &str) -> String {
    let rounded = round_tenths(delta);
    if rounded == 0.0 {
        return format!("0 {unit}");
    }

    let sign = if rounded > 0.0 { '+' } else { '-' };
    let magnitude = rounded.abs();
    if magnitude.fract() == 0.0 {
        format!("{sign}{magnitude:.0} {unit}")
    } else {
        format!("{sign}{magnitude:.1} {unit}")
    }
}

/// Percentage change of `current` against its historical baseline
/// `current - delta`.
///
/// Returns `None` when the current value sits below the kind's suppression
/// threshold, or when the baseline is zero or negative (division by zero,
/// or a sign flip that would make the figure misleading).
pub fn percentage_change(current: f64, delta: f64, kind: MetricKind) -> Option<f64> {
    if current < kind.suppression_threshold() {
        return None;
    }
    if delta == 0.0 {
        return Some(0.0);
    }
    let baseline = current - delta;
    if baseline <= 0.0 {
        return None;
    }
    Some(delta / baseline * 100.0)
}

/// Format a percentage change; `None` renders as an em dash.
pub fn format_percentage(percent: Option<f64>) -> String {
    let Some(percent) = percent else {
        return "—".to_string();
    };

    let rounded = round_tenths(percent);
    if rounded == 0.0 {
        return "0.0%".to_string();
    }
    if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else {
        format!("{rounded:.1}%")
    }
}

/// Format a current metric value for display.
pub fn format_value(value: f64, kind: MetricKind) -> String {
    match kind {
        MetricKind::Score => format!("{value:.1}"),
        MetricKind::Percentage => format!("{value:.1}%"),
        MetricKind::Count => group_thousands(value.round() as i64),
    }
}

/// Insert thousands separators into an integer.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_flat_band() {
        assert_eq!(TrendDirection::from_delta(0.0), TrendDirection::Flat);
        assert_eq!(TrendDirection::from_delta(0.049), TrendDirection::Flat);
        assert_eq!(TrendDirection::from_delta(-0.049), TrendDirection::Flat);
        assert_eq!(TrendDirection::from_delta(0.05), TrendDirection::Up);
        assert_eq!(TrendDirection::from_delta(-0.05), TrendDirection::Down);
        assert_eq!(TrendDirection::from_delta(12.3), TrendDirection::Up);
        assert_eq!(TrendDirection::from_delta(-7.0), TrendDirection::Down);
    }

    #[test]
    fn test_format_change_signs_and_zero() {
        assert_eq!(format_change(50.0, "students"), "+50 students");
        assert_eq!(format_change(-50.0, "students"), "-50 students");
        assert_eq!(format_change(0.0, "students"), "0 students");
        // Rounds to one decimal before deciding on zero
        assert_eq!(format_change(0.04, "students"), "0 students");
        assert_eq!(format_change(-0.04, "students"), "0 students");
    }

    #[test]
    fn test_format_change_decimal_handling() {
        assert_eq!(format_change(2.5, "points"), "+2.5 points");
        assert_eq!(format_change(-1.25, "points"), "-1.3 points");
        assert_eq!(format_change(3.04, "points"), "+3 points");
        assert_eq!(format_change(49.96, "students"), "+50 students");
    }

    #[test]
    fn test_suppression_thresholds() {
        assert_eq!(MetricKind::Count.suppression_threshold(), 50.0);
        assert_eq!(MetricKind::Score.suppression_threshold(), 10.0);
        assert_eq!(MetricKind::Percentage.suppression_threshold(), 5.0);
    }

    #[test]
    fn test_percentage_change_below_threshold() {
        assert_eq!(percentage_change(40.0, 5.0, MetricKind::Count), None);
        assert_eq!(percentage_change(9.9, 1.0, MetricKind::Score), None);
        assert_eq!(percentage_change(4.9, 1.0, MetricKind::Percentage), None);
        // Exactly at threshold is shown
        assert!(percentage_change(50.0, 5.0, MetricKind::Count).is_some());
    }

    #[test]
    fn test_percentage_change_zero_delta() {
        assert_eq!(percentage_change(100.0, 0.0, MetricKind::Count), Some(0.0));
        assert_eq!(percentage_change(10.0, 0.0, MetricKind::Score), Some(0.0));
    }

    #[test]
    fn test_percentage_change_bad_baseline() {
        // baseline = current - delta, zero or negative is undefined
        assert_eq!(percentage_change(100.0, 100.0, MetricKind::Count), None);
        assert_eq!(percentage_change(100.0, 150.0, MetricKind::Count), None);
    }

    #[test]
    fn test_percentage_change_basic() {
        let pct = percentage_change(100.0, 10.0, MetricKind::Count).unwrap();
        assert!((pct - 11.111).abs() < 0.001, "got {pct}");

        let pct = percentage_change(25.0, 5.0, MetricKind::Score).unwrap();
        assert!((pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(None), "—");
        assert_eq!(format_percentage(Some(11.111)), "+11.1%");
        assert_eq!(format_percentage(Some(-3.25)), "-3.2%");
        assert_eq!(format_percentage(Some(0.0)), "0.0%");
        // Values that round to zero render unsigned
        assert_eq!(format_percentage(Some(0.04)), "0.0%");
        assert_eq!(format_percentage(Some(-0.04)), "0.0%");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1234.0, MetricKind::Count), "1,234");
        assert_eq!(format_value(987654.0, MetricKind::Count), "987,654");
        assert_eq!(format_value(21.456, MetricKind::Score), "21.5");
        assert_eq!(format_value(33.0, MetricKind::Percentage), "33.0%");
    }
}
