//! Release version parsing and ordering
//!
//! Versions follow the public PEP 440 scheme: dotted release segments with
//! optional pre-release (`a`, `b`, `rc`), post-release and dev-release
//! suffixes. Release segments compare with implicit zero padding, so `1.0`
//! and `1.0.0` are equal.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const SEPARATORS: &[char] = &['-', '_', '.'];

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreRelease {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "a" | "alpha" => Some(Self::Alpha),
            "b" | "beta" => Some(Self::Beta),
            "rc" | "c" | "pre" | "preview" => Some(Self::ReleaseCandidate),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::ReleaseCandidate => "rc",
        }
    }
}

/// A parsed release version
#[derive(Debug, Clone)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
    text: String,
}

/// Where a version sits relative to its release segment
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    DevOnly,
    Pre(PreRelease, u64),
    Final,
}

impl Version {
    /// Parse a version string such as `1.2`, `v2.0.0rc1` or `1.0.post2.dev3`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let normalized = input.trim().to_ascii_lowercase();
        let without_prefix = normalized.strip_prefix('v').unwrap_or(&normalized);

        let (public, local) = match without_prefix.split_once('+') {
            Some((public, local)) if !local.is_empty() => (public, Some(local.to_string())),
            Some(_) => return Err(VersionError::InvalidFormat(input.to_string())),
            None => (without_prefix, None),
        };

        let release_end = public
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(public.len());
        let (release_str, suffix) = public.split_at(release_end);
        let release_str = release_str.strip_suffix('.').unwrap_or(release_str);

        if release_str.is_empty() {
            return Err(VersionError::InvalidFormat(input.to_string()));
        }

        let release = release_str
            .split('.')
            .map(|segment| segment.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::InvalidFormat(input.to_string()))?;

        let mut version = Self {
            release,
            pre: None,
            post: None,
            dev: None,
            local,
            text: input.trim().to_string(),
        };
        version.parse_suffix(suffix, input)?;
        Ok(version)
    }

    fn parse_suffix(&mut self, mut rest: &str, input: &str) -> Result<(), VersionError> {
        let invalid = || VersionError::InvalidFormat(input.to_string());

        while !rest.is_empty() {
            let had_separator = rest.starts_with(SEPARATORS);
            rest = rest.trim_start_matches(SEPARATORS);

            let tag_end = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            let (tag, after_tag) = rest.split_at(tag_end);
            let after_tag = after_tag.trim_start_matches(SEPARATORS);

            let number_end = after_tag
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_tag.len());
            let (number, after_number) = after_tag.split_at(number_end);
            let number = if number.is_empty() {
                0
            } else {
                number.parse::<u64>().map_err(|_| invalid())?
            };

            // Suffixes must appear in pre, post, dev order and at most once
            if let Some(phase) = PreRelease::parse(tag) {
                if self.pre.is_some() || self.post.is_some() || self.dev.is_some() {
                    return Err(invalid());
                }
                self.pre = Some((phase, number));
            } else if matches!(tag, "post" | "rev" | "r") || (tag.is_empty() && had_separator) {
                if tag.is_empty() && number_end == 0 {
                    return Err(invalid());
                }
                if self.post.is_some() || self.dev.is_some() {
                    return Err(invalid());
                }
                self.post = Some(number);
            } else if tag == "dev" {
                if self.dev.is_some() {
                    return Err(invalid());
                }
                self.dev = Some(number);
            } else {
                return Err(invalid());
            }

            rest = after_number;
        }

        Ok(())
    }

    /// Release segments, e.g. `[1, 2, 0]` for `1.2.0`
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The version exactly as written, used by arbitrary equality (`===`)
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Compare release segments only, padding the shorter one with zeros
    pub fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|i| {
                let a = self.release.get(i).copied().unwrap_or(0);
                let b = other.release.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Check whether the first `prefix.len()` release segments equal `prefix`
    pub fn has_release_prefix(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, segment)| self.release.get(i).copied().unwrap_or(0) == *segment)
    }

    fn phase(&self) -> Phase {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Phase::DevOnly,
            (Some((kind, n)), _, _) => Phase::Pre(kind, n),
            _ => Phase::Final,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = self
            .release
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", release)?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{}", kind.as_str(), n)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other)
            .then_with(|| self.phase().cmp(&other.phase()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| match (self.dev, other.dev) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            })
            .then_with(|| self.local.cmp(&other.local))
    }
}

/// Version parsing error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    InvalidFormat(String),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::InvalidFormat(input) => write!(f, "Invalid version format: '{}'", input),
        }
    }
}

impl std::error::Error for VersionError {}
