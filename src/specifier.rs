// SPDX-License-Identifier: MPL-2.0

//! Translation of PEP 440 version specifiers into [Range]s.
//!
//! A specifier list such as `~=3.1.0, != 3.1.3` is a comma separated
//! conjunction of clauses, each an operator applied to a version. Every clause
//! translates to one [Range] and the clauses of a list are combined by
//! intersection, so the example above yields the two-segment range
//! `[ 3.1.0, 3.1.3 [  [ 3.1.3.post0.dev0, 3.2 [`.
//!
//! The translation is pure: no specifier ever inspects the set of versions
//! that actually exist.

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

use crate::range::Range;
use crate::version::{Version, VersionParseError};

/// Comparison operator of a specifier clause.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `== 3.1`
    Equal,
    /// `== 3.1.*`
    EqualStar,
    /// `!= 3.1`
    NotEqual,
    /// `!= 3.1.*`
    NotEqualStar,
    /// `~= 3.1.2`
    Compatible,
    /// `<= 3.1`
    LessEqual,
    /// `>= 3.1`
    GreaterEqual,
    /// `< 3.1`
    Less,
    /// `> 3.1`
    Greater,
}

/// A single specifier clause, an operator applied to a version.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specifier {
    operator: Operator,
    version: Version,
}

/// A comma separated list of specifier clauses, combined by intersection.
///
/// The empty list puts no constraint at all and translates to the full range.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specifiers(Vec<Specifier>);

/// Error creating [Specifier] or [Specifiers] from failed parsing.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum SpecifierParseError {
    /// The clause does not start with a known operator.
    #[error("missing operator in specifier `{clause}`")]
    MissingOperator {
        /// The offending clause.
        clause: String,
    },
    /// A trailing `.*` is only valid after `==` and `!=`.
    #[error("wildcard is not allowed with operator `{operator}` in specifier `{clause}`")]
    InvalidWildcard {
        /// The operator the wildcard was applied to.
        operator: String,
        /// The offending clause.
        clause: String,
    },
    /// `~=` needs a prefix to be compatible with, so a single release segment
    /// is not enough.
    #[error("compatible release specifier `{clause}` needs at least two release segments")]
    CompatibleReleaseTooShort {
        /// The offending clause.
        clause: String,
    },
    /// The version part of the clause is invalid.
    #[error(transparent)]
    Version(#[from] VersionParseError),
}

impl Specifier {
    /// The operator of this clause.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The version the operator is applied to.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The set of versions matched by this clause.
    pub fn to_range(&self) -> Range<Version> {
        let version = &self.version;
        match self.operator {
            Operator::Equal => Range::singleton(version.clone()),
            Operator::EqualStar => wildcard_range(version.release()),
            // The immediate successor of the excluded version keeps the
            // excluded set closed under local labels and preserves half-open
            // segments: `!= 3.1.3` leaves `[ 3.1.3.post0.dev0, ... [`.
            Operator::NotEqual => Range::strictly_lower_than(version.clone())
                .union(&Range::higher_than(version.bump())),
            Operator::NotEqualStar => wildcard_range(version.release()).complement(),
            Operator::Compatible => {
                // `~=` keeps an explicit pre-release marker verbatim in the
                // lower bound but computes the upper bound from the release
                // prefix truncated by one segment.
                let release = version.release();
                Range::between(version.clone(), prefix_increment(&release[..release.len() - 1]))
            }
            Operator::LessEqual => Range::lower_than(version.clone()),
            Operator::GreaterEqual => Range::higher_than(version.clone()),
            Operator::Less => Range::strictly_lower_than(version.clone()),
            Operator::Greater => Range::strictly_higher_than(version.clone()),
        }
    }
}

/// All versions sharing the given release prefix, pre/post/dev included,
/// as in `== 3.1.*`.
fn wildcard_range(release: &[u64]) -> Range<Version> {
    Range::between(Version::from_release(release), prefix_increment(release))
}

/// The version right after the last explicit segment of a release prefix:
/// `3.1` becomes `3.2`.
fn prefix_increment(release: &[u64]) -> Version {
    let mut next = release.to_vec();
    if let Some(last) = next.last_mut() {
        *last += 1;
    }
    Version::from_release(next)
}

impl Specifiers {
    /// The clauses of the list, in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.0.iter()
    }

    /// The set of versions matched by every clause of the list.
    pub fn to_range(&self) -> Range<Version> {
        self.0
            .iter()
            .fold(Range::full(), |range, specifier| {
                range.intersection(&specifier.to_range())
            })
    }
}

impl FromStr for Specifier {
    type Err = SpecifierParseError;

    fn from_str(clause: &str) -> Result<Self, Self::Err> {
        let trimmed = clause.trim();
        let (operator_text, rest) = ["==", "!=", "~=", "<=", ">=", "<", ">"]
            .iter()
            .find_map(|op| trimmed.strip_prefix(op).map(|rest| (*op, rest)))
            .ok_or_else(|| SpecifierParseError::MissingOperator {
                clause: clause.into(),
            })?;
        let rest = rest.trim();
        let (star, version_text) = match rest.strip_suffix(".*") {
            Some(prefix) => (true, prefix),
            None => (false, rest),
        };
        let version: Version = version_text.parse()?;
        let operator = match (operator_text, star) {
            ("==", false) => Operator::Equal,
            ("==", true) => Operator::EqualStar,
            ("!=", false) => Operator::NotEqual,
            ("!=", true) => Operator::NotEqualStar,
            (_, true) => {
                return Err(SpecifierParseError::InvalidWildcard {
                    operator: operator_text.into(),
                    clause: clause.into(),
                })
            }
            ("~=", false) => {
                if version.release().len() < 2 {
                    return Err(SpecifierParseError::CompatibleReleaseTooShort {
                        clause: clause.into(),
                    });
                }
                Operator::Compatible
            }
            ("<=", false) => Operator::LessEqual,
            (">=", false) => Operator::GreaterEqual,
            ("<", false) => Operator::Less,
            (">", false) => Operator::Greater,
            _ => unreachable!("operator list is exhaustive"),
        };
        Ok(Self { operator, version })
    }
}

impl FromStr for Specifiers {
    type Err = SpecifierParseError;

    fn from_str(list: &str) -> Result<Self, Self::Err> {
        if list.trim().is_empty() {
            return Ok(Self(Vec::new()));
        }
        list.split(',')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::EqualStar => {
                write!(f, "=={}.*", Version::from_release(self.version.release()))
            }
            Operator::NotEqualStar => {
                write!(f, "!={}.*", Version::from_release(self.version.release()))
            }
            operator => {
                let operator = match operator {
                    Operator::Equal => "==",
                    Operator::NotEqual => "!=",
                    Operator::Compatible => "~=",
                    Operator::LessEqual => "<=",
                    Operator::GreaterEqual => ">=",
                    Operator::Less => "<",
                    Operator::Greater => ">",
                    Operator::EqualStar | Operator::NotEqualStar => unreachable!(),
                };
                write!(f, "{}{}", operator, self.version)
            }
        }
    }
}

impl Display for Specifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, specifier) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", specifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for text in ["==3.1", "!=3.1.*", "~=3.1.2", ">=2.2", "<2a1"] {
            let specifier: Specifier = text.parse().unwrap();
            assert_eq!(specifier.to_string(), text);
        }
        let list: Specifiers = " ~= 3.1.0 , != 3.1.3 ".parse().unwrap();
        assert_eq!(list.to_string(), "~=3.1.0, !=3.1.3");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "3.1".parse::<Specifier>(),
            Err(SpecifierParseError::MissingOperator { .. })
        ));
        assert!(matches!(
            ">=3.1.*".parse::<Specifier>(),
            Err(SpecifierParseError::InvalidWildcard { .. })
        ));
        assert!(matches!(
            "~=2".parse::<Specifier>(),
            Err(SpecifierParseError::CompatibleReleaseTooShort { .. })
        ));
        assert!(matches!(
            "==abc".parse::<Specifier>(),
            Err(SpecifierParseError::Version(_))
        ));
    }

    #[test]
    fn empty_list_is_the_full_range() {
        let list: Specifiers = "".parse().unwrap();
        assert_eq!(list.to_range(), Range::full());
    }
}
