//! Command line snapshots.

#[test]
fn cli() {
	trycmd::TestCases::new().case("tests/cli/*.trycmd");
}
