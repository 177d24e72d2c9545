// SPDX-License-Identifier: MPL-2.0

//! PEP 440 version identifiers.
//!
//! A [Version] is a dotted release number optionally followed by pre-release,
//! post-release and dev-release markers and a local label, such as
//! `3.1.2`, `1.0a2`, `2.0.post3` or `1.4.5.dev1+ubuntu.1`.
//! Versions form a total order: for a given release number,
//! `x.devN < x aN < x < x.postN.devM < x.postN`.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// Phase of a pre-release marker, ordered `a` < `b` < `rc`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

/// One dot-separated segment of a local version label.
///
/// Purely numeric segments compare numerically and sort after textual ones.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalSegment {
    Text(String),
    Number(u64),
}

/// A PEP 440 version identifier.
///
/// Equality follows the ordering, so `1.0`, `1.0.0` and `v1.0` are all equal.
/// Versions are immutable once constructed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct Version {
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

impl Version {
    /// Version with the given release segments and no markers.
    pub fn from_release(release: impl Into<Vec<u64>>) -> Self {
        Self {
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    /// The release segments, as written (implicit trailing zeros not included).
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The pre-release marker, if any.
    pub fn pre(&self) -> Option<(PreRelease, u64)> {
        self.pre
    }

    /// The post-release marker, if any.
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// The dev-release marker, if any.
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// The smallest version strictly greater than this one,
    /// ignoring local labels.
    ///
    /// For a version without markers this is its first post-dev release:
    /// `1.0.bump()` is `1.0.post0.dev0`, the tightest exclusive lower bound
    /// usable to carve a single version out of a range.
    pub fn bump(&self) -> Self {
        let mut next = self.clone();
        next.local.clear();
        match (next.post, next.dev) {
            (_, Some(dev)) => next.dev = Some(dev + 1),
            (Some(post), None) => {
                next.post = Some(post + 1);
                next.dev = Some(0);
            }
            (None, None) => {
                next.post = Some(0);
                next.dev = Some(0);
            }
        }
        next
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        let left = self.release.iter().copied().chain(std::iter::repeat(0));
        let right = other.release.iter().copied().chain(std::iter::repeat(0));
        left.take(len).cmp(right.take(len))
    }

    fn pre_key(&self) -> PreKey {
        match self.pre {
            Some((phase, number)) => PreKey::Pre(phase, number),
            // A dev release without pre or post markers sorts
            // before every pre-release of the same release number.
            None if self.post.is_none() && self.dev.is_some() => PreKey::Dev,
            None => PreKey::Final,
        }
    }
}

/// Rank of a version among the pre-releases of its release number.
#[derive(Eq, PartialEq, Ord, PartialOrd)]
enum PreKey {
    Dev,
    Pre(PreRelease, u64),
    Final,
}

/// `x.devN` sorts before `x`, so `Some` is less than `None` here.
fn cmp_dev(left: Option<u64>, right: Option<u64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other)
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| cmp_dev(self.dev, other.dev))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with Eq: ignore the implicit trailing zeros.
        let mut release = &self.release[..];
        while let [rest @ .., 0] = release {
            release = rest;
        }
        release.hash(state);
        self.pre.hash(state);
        self.post.hash(state);
        self.dev.hash(state);
        self.local.hash(state);
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, segment) in self.release.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        if let Some((phase, number)) = self.pre {
            let phase = match phase {
                PreRelease::Alpha => "a",
                PreRelease::Beta => "b",
                PreRelease::Rc => "rc",
            };
            write!(f, "{}{}", phase, number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        for (index, segment) in self.local.iter().enumerate() {
            write!(f, "{}", if index == 0 { '+' } else { '.' })?;
            match segment {
                LocalSegment::Text(text) => write!(f, "{}", text)?,
                LocalSegment::Number(number) => write!(f, "{}", number)?,
            }
        }
        Ok(())
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;
    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// Error creating [Version] from failed parsing.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum VersionParseError {
    /// The version does not start with a numeric release segment.
    #[error("version `{full_version}` has no numeric release segment")]
    MissingRelease {
        /// The full version string being parsed.
        full_version: String,
    },
    /// A numeric component does not fit in a u64.
    #[error("cannot parse `{number}` in `{full_version}` as u64")]
    InvalidNumber {
        /// The offending component.
        number: String,
        /// The full version string being parsed.
        full_version: String,
    },
    /// An alphabetic component is not a known release marker.
    #[error("unknown release marker `{label}` in version `{full_version}`")]
    UnknownLabel {
        /// The offending component.
        label: String,
        /// The full version string being parsed.
        full_version: String,
    },
    /// A marker appears twice, or after a marker it must precede.
    #[error("misplaced release marker `{label}` in version `{full_version}`")]
    MisplacedLabel {
        /// The offending component.
        label: String,
        /// The full version string being parsed.
        full_version: String,
    },
    /// The local label after `+` contains an empty segment.
    #[error("empty local segment in version `{full_version}`")]
    EmptyLocalSegment {
        /// The full version string being parsed.
        full_version: String,
    },
    /// Leftover characters after a complete version.
    #[error("unexpected trailing input `{rest}` in version `{full_version}`")]
    TrailingInput {
        /// The part of the input that could not be consumed.
        rest: String,
        /// The full version string being parsed.
        full_version: String,
    },
}

/// Hand-rolled cursor over a lowercased version string.
struct Cursor<'a> {
    full: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn done(&self) -> bool {
        self.rest.is_empty()
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Consumes one of the `.`/`-`/`_` separators, returning it.
    fn eat_separator(&mut self) -> Option<char> {
        let separator = self.rest.chars().next().filter(|c| ".-_".contains(*c))?;
        self.rest = &self.rest[1..];
        Some(separator)
    }

    /// Consumes a run of digits. `Ok(None)` if the next char is not a digit.
    fn try_number(&mut self) -> Result<Option<u64>, VersionParseError> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Ok(None);
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        match digits.parse() {
            Ok(number) => Ok(Some(number)),
            Err(_) => Err(VersionParseError::InvalidNumber {
                number: digits.into(),
                full_version: self.full.into(),
            }),
        }
    }

    /// Consumes a run of ascii letters.
    fn word(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }

    /// The optional number attached to a marker word, with an optional
    /// separator in between. Defaults to 0, as in `1.0.dev` or `2.0rc`.
    fn marker_number(&mut self) -> Result<u64, VersionParseError> {
        let checkpoint = self.rest;
        self.eat_separator();
        match self.try_number()? {
            Some(number) => Ok(number),
            None => {
                self.rest = checkpoint;
                Ok(0)
            }
        }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(full_version: &str) -> Result<Self, Self::Err> {
        let lowercase = full_version.trim().to_ascii_lowercase();
        let mut cursor = Cursor {
            full: full_version,
            rest: lowercase.strip_prefix('v').unwrap_or(&lowercase),
        };

        let first = match cursor.try_number()? {
            Some(number) => number,
            None => {
                return Err(VersionParseError::MissingRelease {
                    full_version: full_version.into(),
                })
            }
        };
        let mut release = vec![first];
        loop {
            let checkpoint = cursor.rest;
            if !cursor.eat('.') {
                break;
            }
            match cursor.try_number()? {
                Some(number) => release.push(number),
                None => {
                    cursor.rest = checkpoint;
                    break;
                }
            }
        }

        let mut pre = None;
        let mut post = None;
        let mut dev = None;
        while !cursor.done() && !cursor.rest.starts_with('+') {
            let checkpoint = cursor.rest;
            let separator = cursor.eat_separator();
            if let Some(label) = cursor.word() {
                let misplaced = |label: &str| VersionParseError::MisplacedLabel {
                    label: label.into(),
                    full_version: full_version.into(),
                };
                let number = cursor.marker_number()?;
                match label {
                    "a" | "alpha" | "b" | "beta" | "c" | "rc" | "pre" | "preview" => {
                        if pre.is_some() || post.is_some() || dev.is_some() {
                            return Err(misplaced(label));
                        }
                        let phase = match label {
                            "a" | "alpha" => PreRelease::Alpha,
                            "b" | "beta" => PreRelease::Beta,
                            _ => PreRelease::Rc,
                        };
                        pre = Some((phase, number));
                    }
                    "post" | "rev" | "r" => {
                        if post.is_some() || dev.is_some() {
                            return Err(misplaced(label));
                        }
                        post = Some(number);
                    }
                    "dev" => {
                        if dev.is_some() {
                            return Err(misplaced(label));
                        }
                        dev = Some(number);
                    }
                    _ => {
                        return Err(VersionParseError::UnknownLabel {
                            label: label.into(),
                            full_version: full_version.into(),
                        })
                    }
                }
            } else if separator == Some('-') {
                // Implicit post release, as in `1.0-2`.
                match cursor.try_number()? {
                    Some(number) if post.is_none() && dev.is_none() => post = Some(number),
                    _ => {
                        return Err(VersionParseError::TrailingInput {
                            rest: checkpoint.into(),
                            full_version: full_version.into(),
                        })
                    }
                }
            } else {
                return Err(VersionParseError::TrailingInput {
                    rest: checkpoint.into(),
                    full_version: full_version.into(),
                });
            }
        }

        let mut local = Vec::new();
        if cursor.eat('+') {
            loop {
                let end = cursor
                    .rest
                    .find(|c: char| !c.is_ascii_alphanumeric())
                    .unwrap_or(cursor.rest.len());
                if end == 0 {
                    return Err(VersionParseError::EmptyLocalSegment {
                        full_version: full_version.into(),
                    });
                }
                let (segment, rest) = cursor.rest.split_at(end);
                cursor.rest = rest;
                if segment.bytes().all(|b| b.is_ascii_digit()) {
                    match segment.parse() {
                        Ok(number) => local.push(LocalSegment::Number(number)),
                        Err(_) => {
                            return Err(VersionParseError::InvalidNumber {
                                number: segment.into(),
                                full_version: full_version.into(),
                            })
                        }
                    }
                } else {
                    local.push(LocalSegment::Text(segment.into()));
                }
                if cursor.eat_separator().is_none() {
                    break;
                }
            }
        }

        if !cursor.done() {
            return Err(VersionParseError::TrailingInput {
                rest: cursor.rest.into(),
                full_version: full_version.into(),
            });
        }
        Ok(Self {
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        text.parse().unwrap()
    }

    #[test]
    fn ordering_chain() {
        let chain = [
            "0.9",
            "1.0.dev0",
            "1.0.dev456",
            "1.0a1",
            "1.0a2.dev456",
            "1.0a2",
            "1.0b1.dev456",
            "1.0b2",
            "1.0b2.post345.dev456",
            "1.0b2.post345",
            "1.0rc1.dev456",
            "1.0rc1",
            "1.0",
            "1.0+abc.5",
            "1.0+abc.7",
            "1.0+5",
            "1.0.post456.dev34",
            "1.0.post456",
            "1.1.dev1",
            "1.1",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn trailing_zeros_are_implicit() {
        assert_eq!(v("1.0"), v("1"));
        assert_eq!(v("3.1.0"), v("3.1"));
        assert!(v("3.1") < v("3.1.1"));
        assert!(v("3.1.2") < v("3.2"));
    }

    #[test]
    fn normalization() {
        assert_eq!(v("V1.2"), v("1.2"));
        assert_eq!(v("1.0-alpha.3"), v("1.0a3"));
        assert_eq!(v("1.0.PREVIEW2"), v("1.0rc2"));
        assert_eq!(v("1.0-2"), v("1.0.post2"));
        assert_eq!(v("1.0rev3"), v("1.0.post3"));
        assert_eq!(v("1.0.dev"), v("1.0.dev0"));
    }

    #[test]
    fn display_is_canonical() {
        for text in ["3.1.2", "1.0a1", "2.0.post3", "1.4.5.dev1+ubuntu.1"] {
            assert_eq!(v(text).to_string(), text);
        }
        assert_eq!(v("1.0-alpha-3").to_string(), "1.0a3");
    }

    #[test]
    fn bump_is_the_immediate_successor() {
        assert_eq!(v("1.0").bump(), v("1.0.post0.dev0"));
        assert_eq!(v("1.0a1").bump(), v("1.0a1.post0.dev0"));
        assert_eq!(v("1.0.post3").bump(), v("1.0.post4.dev0"));
        assert_eq!(v("1.0.dev4").bump(), v("1.0.dev5"));
        assert!(v("1.0") < v("1.0").bump());
        assert!(v("1.0").bump() < v("1.0.post0"));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "".parse::<Version>(),
            Err(VersionParseError::MissingRelease { .. })
        ));
        assert!(matches!(
            "1.0.banana2".parse::<Version>(),
            Err(VersionParseError::UnknownLabel { .. })
        ));
        assert!(matches!(
            "1.0.dev1a2".parse::<Version>(),
            Err(VersionParseError::MisplacedLabel { .. })
        ));
        assert!(matches!(
            "1.0+".parse::<Version>(),
            Err(VersionParseError::EmptyLocalSegment { .. })
        ));
        assert!(matches!(
            "1.0 == 1.1".parse::<Version>(),
            Err(VersionParseError::TrailingInput { .. })
        ));
    }
}
