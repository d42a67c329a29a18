//! Tests for toolchain generation resolution

use rstest::rstest;
use softbuild::toolchain::ToolchainResolver;

// ============== Easyconfig Scan Tests ==============

#[rstest]
#[case("/apps/easyconfigs/z/zlib/zlib-1.2.12-foss-2022a.eb", Some("2022a"))]
#[case("foo-1.0-intel-2021b.eb", Some("2021b"))]
// The same label twice still counts as a unique match
#[case("/apps/2022a/easybuild/foo-1.0-foss-2022a.eb", Some("2022a"))]
// Two distinct labels with no sub-toolchain hit are ambiguous by design
#[case("/apps/2021b/easybuild/foo-1.0-foss-2022a.eb", None)]
// No label at all and no known component
#[case("foo-1.0.eb", None)]
#[case("", None)]
// Label shape must match exactly: wrong suffix or out-of-range year
#[case("foo-1.0-foss-2022c.eb", None)]
#[case("foo-1.0-foss-2030a.eb", None)]
fn test_resolve_from_easyconfig(#[case] easyconfig: &str, #[case] expected: Option<&str>) {
    let resolver = ToolchainResolver::new().unwrap();
    let result = resolver.resolve(easyconfig, None).unwrap();
    assert_eq!(result.as_deref(), expected);
}

// ============== Sub-toolchain Fallback Tests ==============

#[rstest]
#[case("zlib-1.2.12-GCCcore-11.3.0.eb", Some("2022a"))]
#[case("foo-1.0-GCC-12.2.0.eb", Some("2022b"))]
#[case("foo-1.0-intel-compilers-2023.1.0.eb", Some("2023a"))]
#[case("foo-1.0-iccifort-2020.4.304.eb", Some("2020b"))]
#[case("foo-1.0-GCC-7.3.0-2.30.eb", Some("2018b"))]
fn test_resolve_from_subtoolchain(#[case] easyconfig: &str, #[case] expected: Option<&str>) {
    let resolver = ToolchainResolver::new().unwrap();
    let result = resolver.resolve(easyconfig, None).unwrap();
    assert_eq!(result.as_deref(), expected);
}

#[rstest]
fn test_ambiguous_labels_fall_back_to_subtoolchain() {
    // Two distinct year labels in the path, but the GCCcore component
    // disambiguates to its main toolchain
    let resolver = ToolchainResolver::new().unwrap();
    let result = resolver
        .resolve(
            "/apps/2021b/easybuild/zlib-1.2.12-GCCcore-12.3.0-2022a.eb",
            None,
        )
        .unwrap();
    assert_eq!(result.as_deref(), Some("2023a"));
}

// ============== User Override Tests ==============

#[rstest]
fn test_valid_override_wins_over_content() {
    let resolver = ToolchainResolver::new().unwrap();
    let result = resolver
        .resolve("foo-1.0-foss-2021b.eb", Some("2022a"))
        .unwrap();
    assert_eq!(result.as_deref(), Some("2022a"));
}

#[rstest]
#[case("2022")]
#[case("2022c")]
#[case("22a")]
#[case("2032a")]
#[case("x2022a")]
#[case("2022ab")]
fn test_invalid_override_is_an_error(#[case] user_toolchain: &str) {
    let resolver = ToolchainResolver::new().unwrap();
    let result = resolver.resolve("foo-1.0-foss-2022a.eb", Some(user_toolchain));
    assert!(result.is_err());
}
