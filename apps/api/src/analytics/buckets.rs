//! Employee headcount histogram bins.

pub const UNKNOWN_BUCKET: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
pub struct SizeBucket {
    pub label: &'static str,
    pub min: i64,
    /// Inclusive upper bound; `None` is open-ended.
    pub max: Option<i64>,
}

impl SizeBucket {
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Ordered; the first bin containing a value wins.
pub const EMPLOYEE_SIZE_BUCKETS: [SizeBucket; 6] = [
    SizeBucket { label: "1-10", min: 1, max: Some(10) },
    SizeBucket { label: "11-50", min: 11, max: Some(50) },
    SizeBucket { label: "51-200", min: 51, max: Some(200) },
    SizeBucket { label: "201-500", min: 201, max: Some(500) },
    SizeBucket { label: "501-1000", min: 501, max: Some(1000) },
    SizeBucket { label: "1001+", min: 1001, max: None },
];

/// Missing and non-positive headcounts fall into `Unknown`.
pub fn employee_size_bucket(employees: Option<i64>) -> &'static str {
    employees
        .and_then(|n| EMPLOYEE_SIZE_BUCKETS.iter().find(|b| b.contains(n)))
        .map_or(UNKNOWN_BUCKET, |b| b.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (10, "1-10"),
            (11, "11-50"),
            (50, "11-50"),
            (51, "51-200"),
            (1000, "501-1000"),
            (1001, "1001+"),
            (1, "1-10"),
            (200, "51-200"),
            (201, "201-500"),
            (500, "201-500"),
            (501, "501-1000"),
            (250_000, "1001+"),
        ];
        for (n, expected) in cases {
            assert_eq!(employee_size_bucket(Some(n)), expected, "n={n}");
        }
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        assert_eq!(employee_size_bucket(Some(0)), UNKNOWN_BUCKET);
        assert_eq!(employee_size_bucket(Some(-4)), UNKNOWN_BUCKET);
        assert_eq!(employee_size_bucket(None), UNKNOWN_BUCKET);
    }

    #[test]
    fn test_bins_are_contiguous() {
        for pair in EMPLOYEE_SIZE_BUCKETS.windows(2) {
            assert_eq!(pair[0].max.map(|m| m + 1), Some(pair[1].min));
        }
    }
}
