//! Version specifiers such as `>=1.0,<2.0` or `~=1.4`
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use super::version::Version;
use crate::error::{SchemaError, SchemaResult};
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a single specifier clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `===`
    Arbitrary,
}

impl Operator {
    // Longest operators first so `===` is not read as `==`
    const TOKENS: [(&'static str, Operator); 8] = [
        ("===", Operator::Arbitrary),
        ("~=", Operator::Compatible),
        ("==", Operator::Equal),
        ("!=", Operator::NotEqual),
        ("<=", Operator::LessEqual),
        (">=", Operator::GreaterEqual),
        ("<", Operator::Less),
        (">", Operator::Greater),
    ];

    fn as_str(&self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(token, _)| *token)
            .unwrap_or("")
    }
}

/// One `<operator><version>` clause
#[derive(Debug, Clone)]
pub struct Clause {
    operator: Operator,
    /// `None` only for arbitrary equality, which compares raw strings
    version: Option<Version>,
    /// `==1.*` / `!=1.*` prefix matching
    wildcard: bool,
    raw_version: String,
}

impl Clause {
    fn parse(input: &str, whole: &str) -> SchemaResult<Self> {
        let (operator, rest) = Operator::TOKENS
            .iter()
            .find_map(|(token, op)| input.strip_prefix(*token).map(|rest| (*op, rest.trim())))
            .ok_or_else(|| {
                SchemaError::invalid_specifier(whole, format!("'{}' has no comparison operator", input))
            })?;

        if rest.is_empty() {
            return Err(SchemaError::invalid_specifier(whole, format!("'{}' has no version", input)));
        }

        if operator == Operator::Arbitrary {
            return Ok(Self {
                operator,
                version: None,
                wildcard: false,
                raw_version: rest.to_string(),
            });
        }

        let (version_str, wildcard) = match rest.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (rest, false),
        };

        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(SchemaError::invalid_specifier(
                whole,
                format!("wildcard versions are only allowed with == and !=, got '{}'", input),
            ));
        }

        let version = Version::parse(version_str)
            .map_err(|e| SchemaError::invalid_specifier(whole, e.to_string()))?;

        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(SchemaError::invalid_specifier(
                whole,
                format!("'{}' needs at least two release segments", input),
            ));
        }

        Ok(Self {
            operator,
            version: Some(version),
            wildcard,
            raw_version: rest.to_string(),
        })
    }

    /// Check whether `candidate` satisfies this clause
    pub fn matches(&self, candidate: &Version) -> bool {
        let Some(spec) = &self.version else {
            return candidate.as_str().eq_ignore_ascii_case(&self.raw_version);
        };
        match self.operator {
            Operator::Equal if self.wildcard => candidate.has_release_prefix(spec.release()),
            Operator::NotEqual if self.wildcard => !candidate.has_release_prefix(spec.release()),
            Operator::Equal => candidate == spec,
            Operator::NotEqual => candidate != spec,
            Operator::LessEqual => candidate <= spec,
            Operator::GreaterEqual => candidate >= spec,
            Operator::Less => {
                // `<2.0` does not admit `2.0rc1`
                candidate < spec
                    && !(!spec.is_prerelease()
                        && candidate.is_prerelease()
                        && candidate.cmp_release(spec).is_eq())
            }
            Operator::Greater => {
                // `>1.0` does not admit `1.0.post1`
                candidate > spec
                    && !(!spec.is_postrelease()
                        && candidate.is_postrelease()
                        && candidate.cmp_release(spec).is_eq())
            }
            Operator::Compatible => {
                let release = spec.release();
                candidate >= spec && candidate.has_release_prefix(&release[..release.len() - 1])
            }
            Operator::Arbitrary => candidate.as_str().eq_ignore_ascii_case(&self.raw_version),
        }
    }

    /// Whether this clause opts in to pre-release candidates
    ///
    /// Only inclusive operators naming a pre-release do; `<2.0rc1` and
    /// `!=2.0rc1` still exclude pre-releases.
    fn admits_prereleases(&self) -> bool {
        let inclusive = matches!(
            self.operator,
            Operator::Equal
                | Operator::GreaterEqual
                | Operator::LessEqual
                | Operator::Compatible
                | Operator::Arbitrary
        );
        let names_prerelease = match &self.version {
            Some(version) => version.is_prerelease(),
            None => Version::parse(&self.raw_version).is_ok_and(|v| v.is_prerelease()),
        };
        inclusive && names_prerelease
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.as_str(), self.raw_version)
    }
}

/// Comma-separated conjunction of clauses
///
/// An empty specifier matches every final release. Pre-releases (including
/// dev releases) only match when some clause names a pre-release itself.
#[derive(Debug, Clone)]
pub struct VersionSpecifier {
    clauses: Vec<Clause>,
}

impl VersionSpecifier {
    /// Parse a specifier such as `>=1.0, !=1.3, <2`
    pub fn parse(input: &str) -> SchemaResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::any());
        }

        let clauses = trimmed
            .split(',')
            .map(str::trim)
            .map(|clause| {
                if clause.is_empty() {
                    Err(SchemaError::invalid_specifier(input, "empty clause"))
                } else {
                    Clause::parse(clause, input)
                }
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    /// Specifier that accepts any version
    pub fn any() -> Self {
        Self { clauses: Vec::new() }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether pre-release candidates are eligible at all
    pub fn admits_prereleases(&self) -> bool {
        self.clauses.iter().any(Clause::admits_prereleases)
    }

    /// Check whether `candidate` satisfies every clause
    pub fn contains(&self, candidate: &Version) -> bool {
        if candidate.is_prerelease() && !self.admits_prereleases() {
            return false;
        }
        self.clauses.iter().all(|clause| clause.matches(candidate))
    }

    /// Parse `version` and check it; unparseable versions never match
    pub fn contains_str(&self, version: &str) -> bool {
        Version::parse(version)
            .map(|parsed| self.contains(&parsed))
            .unwrap_or(false)
    }
}

impl Default for VersionSpecifier {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for VersionSpecifier {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .clauses
            .iter()
            .map(|clause| clause.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", rendered)
    }
}
