//! An assertion in a helper file never approves a comparison in the test
//! file that merely shares its line number.

use super::{elsewhere, fixture, read};
use crate::{GoldenConfig, GoldenTest, TestOutcome, WarningKind};

#[test]
fn test_assertion_in_other_file_on_same_line() {
    let (_dir, path) = fixture("a = 1\nb = 1\n");
    let test = GoldenTest::new(GoldenConfig::update());
    let golden = test.open(&path).unwrap();
    if golden.out("a") == 99 {}
    elsewhere::assert_matches(&golden, "b", 2);

    let report = test
        .teardown(&TestOutcome {
            name: "same_line".into(),
            passed: true,
        })
        .unwrap();

    assert_eq!(read(&path), "a = 1\nb = 2\n");
    let ignored = report.warnings_of(WarningKind::OutsideAssert);
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].site.line, 12);
    assert!(ignored[0].site.file.ends_with("same_line.rs"));
}
