#[test]
fn vreg_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/vreg_error_pass.rs");
}
