use crate::model::Stat;

const NS_PER_US: f64 = 1_000.0;
const NS_PER_MS: f64 = 1_000_000.0;
const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Magnitude above which scaling by 100 would overflow to infinity.
const ROUNDING_LIMIT: f64 = f64::MAX / 100.0;

/// Round to two decimal places, half away from zero. Non-finite input becomes 0.
///
/// Values too large to scale are already integral and pass through unchanged.
pub fn normalize_value(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value.abs() > ROUNDING_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// Format a value for display, scaling nanoseconds and bytes to a readable unit
///
/// Display only: stored values and sort totals never go through this.
pub fn format_value(value: f64, unit: &str) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    match unit {
        "ns" => {
            if value >= NS_PER_MS {
                format!("{:.2} ms", value / NS_PER_MS)
            } else if value >= NS_PER_US {
                format!("{:.2} μs", value / NS_PER_US)
            } else {
                format!("{:.0} ns", value)
            }
        }
        "b" | "B" | "bytes" => {
            if value >= GIB {
                format!("{:.2} GB", value / GIB)
            } else if value >= MIB {
                format!("{:.2} MB", value / MIB)
            } else if value >= KIB {
                format!("{:.2} KB", value / KIB)
            } else {
                format!("{:.0} B", value)
            }
        }
        _ => value.to_string(),
    }
}

/// Identity of "the same measured quantity" across records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub kind: String,
    pub unit: String,
    pub per: String,
}

impl Signature {
    pub fn of(stat: &Stat) -> Self {
        Self {
            kind: stat.kind.clone(),
            unit: stat.unit.clone(),
            per: stat.per.clone(),
        }
    }

    pub fn matches(&self, stat: &Stat) -> bool {
        self.kind == stat.kind && self.unit == stat.unit && self.per == stat.per
    }

    /// Chart title: `type (unit/per)`, `type (unit)`, `type/per` or bare `type`.
    pub fn title(&self) -> String {
        match (self.unit.is_empty(), self.per.is_empty()) {
            (false, false) => format!("{} ({}/{})", self.kind, self.unit, self.per),
            (false, true) => format!("{} ({})", self.kind, self.unit),
            (true, false) => format!("{}/{}", self.kind, self.per),
            (true, true) => self.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nanoseconds() {
        assert_eq!(format_value(1_500_000.0, "ns"), "1.50 ms");
        assert_eq!(format_value(2_500.0, "ns"), "2.50 μs");
        assert_eq!(format_value(999.0, "ns"), "999 ns");
        assert_eq!(format_value(0.0, "ns"), "0");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_value(512.0, "b"), "512 B");
        assert_eq!(format_value(2048.0, "b"), "2.00 KB");
        assert_eq!(format_value(3.0 * 1_048_576.0, "b"), "3.00 MB");
        assert_eq!(format_value(1_073_741_824.0, "bytes"), "1.00 GB");
        assert_eq!(format_value(1536.0, "B"), "1.50 KB");
    }

    #[test]
    fn test_format_unknown_unit_is_plain_number() {
        assert_eq!(format_value(42.0, "allocs"), "42");
        assert_eq!(format_value(1.5, ""), "1.5");
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value(3.14159), 3.14);
        assert_eq!(normalize_value(0.125), 0.13);
        assert_eq!(normalize_value(-0.125), -0.13);
        assert_eq!(normalize_value(f64::NAN), 0.0);
        assert_eq!(normalize_value(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_huge_values_stay_finite() {
        assert_eq!(normalize_value(1e307), 1e307);
        assert_eq!(normalize_value(-1e307), -1e307);
        assert_eq!(normalize_value(f64::MAX), f64::MAX);
    }

    #[test]
    fn test_title_variants() {
        let sig = |u: &str, p: &str| Signature::of(&Stat::new("Execution Time", 1.0, u, p));

        assert_eq!(sig("ns", "op").title(), "Execution Time (ns/op)");
        assert_eq!(sig("ns", "").title(), "Execution Time (ns)");
        assert_eq!(sig("", "op").title(), "Execution Time/op");
        assert_eq!(sig("", "").title(), "Execution Time");
    }

    #[test]
    fn test_signature_matching_ignores_value() {
        let sig = Signature::of(&Stat::new("time", 10.0, "ns", "op"));
        assert!(sig.matches(&Stat::new("time", 99.0, "ns", "op")));
        assert!(!sig.matches(&Stat::new("time", 10.0, "ms", "op")));
        assert!(!sig.matches(&Stat::new("time", 10.0, "ns", "")));
    }
}
