//! Comparisons made outside the test's own source file.

use crate::{golden_assert, Golden};

pub fn matches(golden: &Golden, key: &str, value: i64) -> bool {
    golden.out(key) == value
}

// The assertion must stay on line 12, level with the comparison in same_line.rs.
pub fn assert_matches(golden: &Golden, key: &str, value: i64) {
    let expected = golden.out(key);
    golden_assert!(golden, expected == value);
}
