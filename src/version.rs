// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Semantic version parsing and three-way comparison.
//!
//! Ordering follows semver precedence: numeric fields compare numerically,
//! a pre-release sorts below the same numeric triple without one, and build
//! metadata never affects ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised when a version string does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version {input:?}: {reason}")]
    Invalid { input: String, reason: String },

    #[error("empty version string")]
    Empty,
}

/// How a version string is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` only.
    #[default]
    Strict,
    /// Strict grammar, plus bare `N` and `N.M` padded with zeros.
    /// Service managers report plain integers such as `"245"`.
    Numeric,
}

/// A parsed, immutable semantic version.
///
/// `Display` returns the text the version was parsed from, so values echoed
/// back in diagnostics match what the collaborator reported.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    raw: String,
    inner: semver::Version,
    mode: ParseMode,
}

impl SemanticVersion {
    /// Parse a strict semantic version.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        Self::parse_with(text, ParseMode::Strict)
    }

    /// Parse a semantic version, also accepting bare numeric versions.
    pub fn parse_lenient(text: &str) -> Result<Self, VersionError> {
        Self::parse_with(text, ParseMode::Numeric)
    }

    pub fn parse_with(text: &str, mode: ParseMode) -> Result<Self, VersionError> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let normalized = match mode {
            ParseMode::Strict => None,
            ParseMode::Numeric => pad_numeric(text),
        };

        let inner = semver::Version::parse(normalized.as_deref().unwrap_or(text)).map_err(
            |e| VersionError::Invalid {
                input: text.to_string(),
                reason: e.to_string(),
            },
        )?;

        Ok(Self {
            raw: text.to_string(),
            inner,
            mode,
        })
    }

    /// Three-way comparison against another version string.
    ///
    /// Returns -1 if `self` is lower, 1 if higher, 0 if equal. `other` is
    /// parsed with the same mode `self` was parsed with.
    pub fn compare(&self, other: &str) -> Result<i32, VersionError> {
        let other = Self::parse_with(other, self.mode)?;
        Ok(match self.cmp(&other) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Pre-release identifier, if any (e.g. `alpha.1`).
    pub fn pre_release(&self) -> Option<&str> {
        (!self.inner.pre.is_empty()).then(|| self.inner.pre.as_str())
    }

    /// Build metadata, if any. Informational only.
    pub fn build(&self) -> Option<&str> {
        (!self.inner.build.is_empty()).then(|| self.inner.build.as_str())
    }

    /// The original text this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    fn precedence_key(&self) -> (u64, u64, u64, &semver::Prerelease) {
        (
            self.inner.major,
            self.inner.minor,
            self.inner.patch,
            &self.inner.pre,
        )
    }
}

/// `"100"` -> `"100.0.0"`, `"1.2"` -> `"1.2.0"`; anything else is left alone.
fn pad_numeric(text: &str) -> Option<String> {
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let parts: Vec<&str> = text.split('.').collect();
    match parts.as_slice() {
        [major] if is_number(major) => Some(format!("{}.0.0", trim_zeros(major))),
        [major, minor] if is_number(major) && is_number(minor) => Some(format!(
            "{}.{}.0",
            trim_zeros(major),
            trim_zeros(minor)
        )),
        _ => None,
    }
}

// Bare integers like "0219" are still integers; semver itself rejects leading zeros.
fn trim_zeros(s: &str) -> &str {
    let t = s.trim_start_matches('0');
    if t.is_empty() {
        "0"
    } else {
        t
    }
}

/// Parse `a` strictly and compare it against `b`.
pub fn compare_versions(a: &str, b: &str) -> Result<i32, VersionError> {
    SemanticVersion::parse(a)?.compare(b)
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.precedence_key() == other.precedence_key()
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence_key().cmp(&other.precedence_key())
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Full semver strings come back in [`ParseMode::Strict`]; only bare
/// numeric forms such as `"219"` fall back to [`ParseMode::Numeric`].
impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .or_else(|_| Self::parse_lenient(&raw))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_grammar() {
        let v = SemanticVersion::parse("1.2.6-alpha.1+git.abc").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 6));
        assert_eq!(v.pre_release(), Some("alpha.1"));
        assert_eq!(v.build(), Some("git.abc"));
        assert_eq!(v.to_string(), "1.2.6-alpha.1+git.abc");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SemanticVersion::parse("1.2").is_err());
        assert!(SemanticVersion::parse("100").is_err());
        assert!(SemanticVersion::parse("v1.2.3").is_err());
        assert!(SemanticVersion::parse("1.2.3-").is_err());
        assert_eq!(SemanticVersion::parse(""), Err(VersionError::Empty));
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        assert!(SemanticVersion::parse(" 1.2.3").is_err());
        assert!(SemanticVersion::parse("1.2.3\n").is_err());
        assert!(SemanticVersion::parse(" 1.2.3\n").is_err());
        assert!(SemanticVersion::parse("  ").is_err());
        assert!(SemanticVersion::parse_lenient(" 100").is_err());
        assert!(SemanticVersion::parse_lenient("100\n").is_err());

        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert!(v.compare("1.2.3 ").is_err());
    }

    #[test]
    fn test_lenient_accepts_bare_numbers() {
        let v = SemanticVersion::parse_lenient("100").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (100, 0, 0));
        assert_eq!(v.to_string(), "100");

        let v = SemanticVersion::parse_lenient("2.5").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (2, 5, 0));

        let v = SemanticVersion::parse_lenient("1.2.3-rc1").unwrap();
        assert_eq!(v.pre_release(), Some("rc1"));

        assert!(SemanticVersion::parse_lenient("abc").is_err());
        assert!(SemanticVersion::parse_lenient("1..2").is_err());
    }

    #[test]
    fn test_lenient_strips_leading_zeros() {
        let v = SemanticVersion::parse_lenient("0219").unwrap();
        assert_eq!(v.major(), 219);
        assert_eq!(v.to_string(), "0219");
    }

    #[test]
    fn test_numeric_fields_compare_numerically() {
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ok(1));
        assert_eq!(compare_versions("1.9.0", "1.10.0"), Ok(-1));
        assert_eq!(compare_versions("0.0.10", "0.0.2"), Ok(1));
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        assert_eq!(compare_versions("1.2.6-alpha", "1.2.6"), Ok(-1));
        assert_eq!(compare_versions("1.2.6", "1.2.6-alpha"), Ok(1));
        assert_eq!(compare_versions("1.2.6-alpha", "1.2.6-beta"), Ok(-1));
        assert_eq!(compare_versions("1.2.6-alpha.2", "1.2.6-alpha.10"), Ok(-1));
        assert_eq!(compare_versions("1.2.6-alpha", "1.2.5"), Ok(1));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(compare_versions("1.2.3+git", "1.2.3"), Ok(0));
        assert_eq!(compare_versions("1.2.3+a", "1.2.3+b"), Ok(0));
        assert_eq!(
            SemanticVersion::parse("1.2.3+a").unwrap(),
            SemanticVersion::parse("1.2.3+zzz").unwrap()
        );
    }

    #[test]
    fn test_compare_propagates_parse_error() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert!(matches!(
            v.compare("not-a-version"),
            Err(VersionError::Invalid { .. })
        ));
        assert!(compare_versions("garbage", "1.2.3").is_err());
    }

    #[test]
    fn test_compare_uses_receiver_mode() {
        let sm = SemanticVersion::parse_lenient("100").unwrap();
        assert_eq!(sm.compare("99"), Ok(1));
        assert_eq!(sm.compare("100"), Ok(0));
        assert_eq!(sm.compare("101"), Ok(-1));

        let strict = SemanticVersion::parse("100.0.0").unwrap();
        assert!(strict.compare("101").is_err());
    }

    #[test]
    fn test_antisymmetry_and_reflexivity() {
        let samples = [
            "0.1.0",
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-beta",
            "1.0.0",
            "1.0.0+build",
            "1.2.3+git",
            "1.2.4+git",
            "1.2.6-alpha",
            "2.0.0",
        ];
        for a in samples {
            assert_eq!(compare_versions(a, a), Ok(0), "{a} vs itself");
            for b in samples {
                let ab = compare_versions(a, b).unwrap();
                let ba = compare_versions(b, a).unwrap();
                assert_eq!(ab, -ba, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_serde_uses_original_text() {
        let v = SemanticVersion::parse("1.2.3+git").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"1.2.3+git\"");

        let back: SemanticVersion = serde_json::from_str("\"219\"").unwrap();
        assert_eq!(back.major(), 219);
        assert_eq!(back.to_string(), "219");
    }

    #[test]
    fn test_deserialize_keeps_strict_mode_for_full_versions() {
        let strict: SemanticVersion = serde_json::from_str("\"1.2.3+git\"").unwrap();
        assert_eq!(strict.mode(), ParseMode::Strict);
        assert!(strict.compare("1.2").is_err());
        assert_eq!(strict.compare("1.2.3"), Ok(0));

        let numeric: SemanticVersion = serde_json::from_str("\"219\"").unwrap();
        assert_eq!(numeric.mode(), ParseMode::Numeric);
        assert_eq!(numeric.compare("220"), Ok(-1));

        assert!(serde_json::from_str::<SemanticVersion>("\" 1.2.3\"").is_err());
        assert!(serde_json::from_str::<SemanticVersion>("\"latest\"").is_err());
    }
}
