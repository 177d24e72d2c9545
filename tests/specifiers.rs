// SPDX-License-Identifier: MPL-2.0

use pepgrub::range::Range;
use pepgrub::specifier::Specifiers;
use pepgrub::version::Version;

fn range(specifiers: &str) -> Range<Version> {
    specifiers.parse::<Specifiers>().unwrap().to_range()
}

fn v(version: &str) -> Version {
    version.parse().unwrap()
}

#[test]
fn translations() {
    for (specifiers, expected) in [
        ("~=3.1", "3.1 <= v < 4"),
        ("~=3.1.2", "3.1.2 <= v < 3.2"),
        ("~=3.1a1", "3.1a1 <= v < 4"),
        ("==3.1", "3.1"),
        ("==2.*", "2 <= v < 3"),
        ("~=2.0", "2.0 <= v < 3"),
        ("==3.1.*", "3.1 <= v < 3.2"),
        ("~=3.1.0", "3.1.0 <= v < 3.2"),
        (">=2.2, <3", "2.2 <= v < 3"),
        ("", "∗"),
    ] {
        assert_eq!(range(specifiers).to_string(), expected, "{:?}", specifiers);
    }
}

#[test]
fn exclusion_splits_at_the_post_dev_boundary() {
    // `!=` must keep post and dev releases of the excluded version out of
    // the lower segment, but let post releases of other versions through.
    assert_eq!(
        range("~=3.1.0, != 3.1.3").to_string(),
        "[ 3.1.0, 3.1.3 [  [ 3.1.3.post0.dev0, 3.2 ["
    );
    let excluded = range("!=3.1.3");
    assert!(!excluded.contains(&v("3.1.3")));
    assert!(!excluded.contains(&v("3.1.3+local")));
    assert!(excluded.contains(&v("3.1.3.post1")));
    assert!(excluded.contains(&v("3.1.4")));
}

#[test]
fn wildcard_exclusion() {
    let excluded = range("!=3.1.*");
    assert!(!excluded.contains(&v("3.1")));
    assert!(!excluded.contains(&v("3.1.9.post2")));
    assert!(excluded.contains(&v("3.0.9")));
    assert!(excluded.contains(&v("3.2")));
}

#[test]
fn compatible_release_equivalences() {
    // PEP 440 defines `~=` as a pairing of `>=` and `==X.*` clauses.
    for (left, right) in [
        ("~=2.2", ">=2.2, ==2.*"),
        ("~=1.4.5", ">=1.4.5, ==1.4.*"),
        ("~=2.2.post3", ">=2.2.post3, ==2.*"),
        ("~=1.4.5a4", ">=1.4.5a4, ==1.4.*"),
    ] {
        assert_eq!(range(left), range(right), "{} vs {}", left, right);
    }
}

#[test]
fn ordered_comparisons_follow_version_ordering() {
    let lower = range("<2.0");
    // A pre-release of the bound sorts below the bound itself.
    assert!(lower.contains(&v("2.0a1")));
    assert!(lower.contains(&v("1.9.post4")));
    assert!(!lower.contains(&v("2.0")));
    assert!(!lower.contains(&v("2.0.post0.dev0")));

    let higher = range(">=1.0");
    assert!(!higher.contains(&v("1.0.dev3")));
    assert!(!higher.contains(&v("1.0rc1")));
    assert!(higher.contains(&v("1.0")));
    assert!(higher.contains(&v("1.0.post0")));
}

#[test]
fn exact_match_ignores_trailing_zeros() {
    let exact = range("==3.1");
    assert!(exact.contains(&v("3.1")));
    assert!(exact.contains(&v("3.1.0")));
    assert!(!exact.contains(&v("3.1.1")));
    assert!(!exact.contains(&v("3.1a1")));
}
