//! Selecting tests by name path
//!
//! A pattern like `TestWithSubTests/subtest with identifier` is split on `/`
//! and each segment must match the test name at that depth exactly, either as
//! registered or in its escaped (`_` for whitespace) form. Depths past the end
//! of the pattern are unrestricted.

/// Name-path filter applied while running a suite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    segments: Vec<String>,
}

impl RunFilter {
    /// A filter that selects everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a slash-separated pattern; an empty pattern selects everything
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Self::all();
        }
        Self {
            segments: pattern.split('/').map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether a test named `name` (reported as `segment`) at `depth` runs
    pub fn matches(&self, depth: usize, name: &str, segment: &str) -> bool {
        match self.segments.get(depth) {
            None => true,
            Some(wanted) => wanted == name || wanted == segment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_matches_everything() {
        let filter = RunFilter::parse("  ");
        assert!(filter.is_empty());
        assert!(filter.matches(0, "Anything", "Anything"));
        assert!(filter.matches(3, "deep", "deep"));
    }

    #[test]
    fn test_exact_top_level_match() {
        let filter = RunFilter::parse("TestWithSubTests");
        assert!(filter.matches(0, "TestWithSubTests", "TestWithSubTests"));
        assert!(!filter.matches(0, "TestWith", "TestWith"));
        assert!(!filter.matches(0, "TestWithSubTestsMore", "TestWithSubTestsMore"));
        // children of a matched test are unrestricted
        assert!(filter.matches(1, "another subtest", "another_subtest"));
    }

    #[test]
    fn test_segment_matches_raw_or_escaped_name() {
        let raw = RunFilter::parse("TestWithSubTests/subtest with identifier");
        let escaped = RunFilter::parse("TestWithSubTests/subtest_with_identifier");
        for filter in [raw, escaped] {
            assert!(filter.matches(1, "subtest with identifier", "subtest_with_identifier"));
            assert!(!filter.matches(1, "another subtest", "another_subtest"));
        }
    }
}
