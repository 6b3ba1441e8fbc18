//! Maven version ordering, version specifications and the compatibility
//! heuristic used to match required dependencies against runtime ones.
//!
//! Ordering follows Maven rather than semver:
//! - items are split on `.` and `-`
//! - numeric items compare as numbers, trailing zeros are insignificant
//! - well-known qualifiers order as
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// A parsed Maven version with comparable items.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Item {
    Int(u64),
    Qualifier(Qualifier),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let items = version
            .split(['.', '-'])
            .filter(|token| !token.is_empty())
            .map(Item::classify)
            .collect();
        Self {
            original: version.to_string(),
            items,
        }
    }

    /// Major version as Maven's `major.minor.incremental-qualifier` split
    /// sees it; `0` for versions that do not follow that shape.
    pub fn major(&self) -> u64 {
        self.numeric_prefix().map(|(major, _)| major).unwrap_or(0)
    }

    /// Minor version, with the same fallback as [`major`](Self::major).
    pub fn minor(&self) -> u64 {
        self.numeric_prefix().map(|(_, minor)| minor).unwrap_or(0)
    }

    /// `(major, minor)` if the part before the first `-` consists of one to
    /// three dot-separated numbers without leading zeros.
    fn numeric_prefix(&self) -> Option<(u64, u64)> {
        let base = self
            .original
            .split_once('-')
            .map(|(base, _)| base)
            .unwrap_or(&self.original);
        let parts: Vec<&str> = base.split('.').collect();
        if parts.len() > 3 {
            return None;
        }
        let mut numbers = Vec::with_capacity(parts.len());
        for part in parts {
            let plain = !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && !(part.len() > 1 && part.starts_with('0'));
            if !plain {
                return None;
            }
            numbers.push(part.parse::<u64>().ok()?);
        }
        Some((numbers[0], numbers.get(1).copied().unwrap_or(0)))
    }
}

impl Item {
    fn classify(token: &str) -> Item {
        if let Ok(n) = token.parse::<u64>() {
            return Item::Int(n);
        }
        match token.to_lowercase().as_str() {
            "alpha" | "a" => Item::Qualifier(Qualifier::Alpha),
            "beta" | "b" => Item::Qualifier(Qualifier::Beta),
            "milestone" | "m" => Item::Qualifier(Qualifier::Milestone),
            "rc" | "cr" => Item::Qualifier(Qualifier::Rc),
            "snapshot" => Item::Qualifier(Qualifier::Snapshot),
            "ga" | "final" | "release" => Item::Qualifier(Qualifier::Release),
            "sp" => Item::Qualifier(Qualifier::Sp),
            _ => Item::Text(token.to_string()),
        }
    }

    /// How this item compares against a missing item in a shorter version.
    fn cmp_absent(&self) -> Ordering {
        match self {
            Item::Int(n) => n.cmp(&0),
            Item::Qualifier(q) => q.cmp(&Qualifier::Release),
            Item::Text(_) => Ordering::Less,
        }
    }

    fn cmp_item(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Int(a), Item::Int(b)) => a.cmp(b),
            (Item::Qualifier(a), Item::Qualifier(b)) => a.cmp(b),
            (Item::Text(a), Item::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Item::Int(_), _) => Ordering::Greater,
            (_, Item::Int(_)) => Ordering::Less,
            // Unknown text sits between the pre-release qualifiers and release.
            (Item::Qualifier(q), Item::Text(_)) => {
                if *q >= Qualifier::Release {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Item::Text(_), Item::Qualifier(q)) => {
                if *q >= Qualifier::Release {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for i in 0..len {
            let ord = match (self.items.get(i), other.items.get(i)) {
                (Some(a), Some(b)) => a.cmp_item(b),
                (Some(a), None) => a.cmp_absent(),
                (None, Some(b)) => b.cmp_absent().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version specification must not be empty")]
    Empty,

    #[error("unbounded range: {0}")]
    Unbalanced(String),

    #[error("single version must be surrounded by []: {0}")]
    OpenSingleVersion(String),

    #[error("ranges must not contain more than one comma: {0}")]
    TooManyBounds(String),

    #[error("range defies version ordering: {0}")]
    ReversedBounds(String),

    #[error("range cannot have identical boundaries: {0}")]
    IdenticalBounds(String),

    #[error("ranges overlap: {0}")]
    Overlap(String),

    #[error("only fully-qualified sets allowed in multiple set scenario: {0}")]
    MixedSet(String),
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

/// One interval of a [`VersionSpec`]. Missing bounds are unbounded.
#[derive(Debug, Clone)]
pub struct Restriction {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Restriction {
    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(lower) = &self.lower {
            match version.cmp(&lower.version) {
                Ordering::Less => return false,
                Ordering::Equal if !lower.inclusive => return false,
                _ => {}
            }
        }
        if let Some(upper) = &self.upper {
            match version.cmp(&upper.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !upper.inclusive => return false,
                _ => {}
            }
        }
        true
    }

    fn parse(spec: &str) -> Result<Self, VersionParseError> {
        let lower_inclusive = spec.starts_with('[');
        let upper_inclusive = spec.ends_with(']');
        let inner = spec[1..spec.len() - 1].trim();

        let Some((lower, upper)) = inner.split_once(',') else {
            if !lower_inclusive || !upper_inclusive {
                return Err(VersionParseError::OpenSingleVersion(spec.to_string()));
            }
            let exact = MavenVersion::parse(inner);
            return Ok(Restriction {
                lower: Some(Bound {
                    version: exact.clone(),
                    inclusive: true,
                }),
                upper: Some(Bound {
                    version: exact,
                    inclusive: true,
                }),
            });
        };
        if upper.contains(',') {
            return Err(VersionParseError::TooManyBounds(spec.to_string()));
        }

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: MavenVersion::parse(text),
                inclusive,
            })
        };
        let restriction = Restriction {
            lower: bound(lower, lower_inclusive),
            upper: bound(upper, upper_inclusive),
        };
        if let (Some(lo), Some(hi)) = (&restriction.lower, &restriction.upper) {
            match hi.version.cmp(&lo.version) {
                Ordering::Less => return Err(VersionParseError::ReversedBounds(spec.to_string())),
                Ordering::Equal if !(lo.inclusive && hi.inclusive) => {
                    return Err(VersionParseError::IdenticalBounds(spec.to_string()))
                }
                _ => {}
            }
        }
        Ok(restriction)
    }
}

/// A required version: either a bare recommended version (`1.0`) or a set
/// of intervals (`[1.0,2.0)`, `(,1.0],[1.2,)`).
#[derive(Debug, Clone)]
pub struct VersionSpec {
    pub recommended: Option<MavenVersion>,
    pub restrictions: Vec<Restriction>,
}

impl VersionSpec {
    pub fn parse(spec: &str) -> Result<Self, VersionParseError> {
        let mut rest = spec.trim();
        if rest.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut restrictions: Vec<Restriction> = Vec::new();
        while rest.starts_with('[') || rest.starts_with('(') {
            let close = match (rest.find(')'), rest.find(']')) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => return Err(VersionParseError::Unbalanced(spec.to_string())),
            };
            let restriction = Restriction::parse(&rest[..=close])?;
            if let (Some(prev), Some(lower)) = (
                restrictions.last().and_then(|r| r.upper.as_ref()),
                restriction.lower.as_ref(),
            ) {
                if lower.version < prev.version {
                    return Err(VersionParseError::Overlap(spec.to_string()));
                }
            }
            restrictions.push(restriction);
            rest = rest[close + 1..].trim_start();
            if let Some(stripped) = rest.strip_prefix(',') {
                rest = stripped.trim_start();
            }
        }

        if rest.is_empty() {
            return Ok(Self {
                recommended: None,
                restrictions,
            });
        }
        if !restrictions.is_empty() {
            return Err(VersionParseError::MixedSet(spec.to_string()));
        }
        if rest.contains(['[', ']', '(', ')', ',']) {
            return Err(VersionParseError::Unbalanced(spec.to_string()));
        }
        Ok(Self {
            recommended: Some(MavenVersion::parse(rest)),
            restrictions: Vec::new(),
        })
    }

    /// True for bracketed specs.
    pub fn is_range(&self) -> bool {
        self.recommended.is_none()
    }

    /// Whether `version` lies inside any interval. A bare version matches
    /// only itself.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        match &self.recommended {
            Some(recommended) => recommended == version,
            None => self.restrictions.iter().any(|r| r.contains(version)),
        }
    }
}

/// Decide whether `candidate` satisfies `required`.
///
/// Ranges are honored literally. A bare required version accepts any
/// candidate with the same major version and an equal or higher minor
/// version.
pub fn is_compatible(required: &str, candidate: &str) -> Result<bool, VersionParseError> {
    let spec = VersionSpec::parse(required)?;
    let candidate = MavenVersion::parse(candidate);
    Ok(match &spec.recommended {
        Some(recommended) => {
            recommended.major() == candidate.major() && recommended.minor() <= candidate.minor()
        }
        None => spec.contains(&candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_ordering() {
        assert!(MavenVersion::parse("1.0") < MavenVersion::parse("2.0"));
        assert!(MavenVersion::parse("1.0.0") < MavenVersion::parse("1.0.1"));
        assert!(MavenVersion::parse("1.0.1") < MavenVersion::parse("1.1.0"));
        assert!(MavenVersion::parse("1.9") < MavenVersion::parse("1.10"));
    }

    #[test]
    fn qualifier_ordering() {
        let ordered = [
            "1.0-alpha",
            "1.0-beta",
            "1.0-milestone",
            "1.0-rc",
            "1.0-SNAPSHOT",
            "1.0",
            "1.0-sp",
        ];
        for pair in ordered.windows(2) {
            assert!(
                MavenVersion::parse(pair[0]) < MavenVersion::parse(pair[1]),
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn trailing_zeros_equal() {
        assert_eq!(MavenVersion::parse("1.0"), MavenVersion::parse("1.0.0"));
        assert_eq!(MavenVersion::parse("1"), MavenVersion::parse("1.0.0"));
    }

    #[test]
    fn unknown_qualifier_sorts_before_release() {
        assert!(MavenVersion::parse("1.0.0-jre") < MavenVersion::parse("1.0.0"));
        assert!(MavenVersion::parse("31.0-jre") < MavenVersion::parse("32.0-jre"));
    }

    #[test]
    fn major_minor_split() {
        let v = MavenVersion::parse("2.27.4-SNAPSHOT");
        assert_eq!((v.major(), v.minor()), (2, 27));
        let v = MavenVersion::parse("3");
        assert_eq!((v.major(), v.minor()), (3, 0));
    }

    #[test]
    fn non_conforming_versions_have_zero_major_minor() {
        for text in ["1.2.3.4", "01.2", "1..2", "r5", "1.x"] {
            let v = MavenVersion::parse(text);
            assert_eq!((v.major(), v.minor()), (0, 0), "{text}");
        }
    }

    #[test]
    fn range_inclusive_and_exclusive() {
        let spec = VersionSpec::parse("[1.0,2.0)").unwrap();
        assert!(spec.is_range());
        assert!(spec.contains(&MavenVersion::parse("1.0")));
        assert!(spec.contains(&MavenVersion::parse("1.9.9")));
        assert!(!spec.contains(&MavenVersion::parse("2.0")));
        assert!(!spec.contains(&MavenVersion::parse("0.9")));
    }

    #[test]
    fn range_open_lower() {
        let spec = VersionSpec::parse("(,2.0]").unwrap();
        assert!(spec.contains(&MavenVersion::parse("0.1")));
        assert!(spec.contains(&MavenVersion::parse("2.0")));
        assert!(!spec.contains(&MavenVersion::parse("2.0.1")));
    }

    #[test]
    fn exact_range() {
        let spec = VersionSpec::parse("[1.5]").unwrap();
        assert!(spec.contains(&MavenVersion::parse("1.5")));
        assert!(!spec.contains(&MavenVersion::parse("1.6")));
    }

    #[test]
    fn union_of_ranges() {
        let spec = VersionSpec::parse("[1,2),[3,4)").unwrap();
        assert_eq!(spec.restrictions.len(), 2);
        assert!(spec.contains(&MavenVersion::parse("1.5")));
        assert!(!spec.contains(&MavenVersion::parse("2.5")));
        assert!(spec.contains(&MavenVersion::parse("3.0")));
    }

    #[test]
    fn bare_version_is_recommended() {
        let spec = VersionSpec::parse("1.0").unwrap();
        assert!(!spec.is_range());
        assert_eq!(spec.recommended.unwrap().original, "1.0");
    }

    #[test]
    fn malformed_specs() {
        assert_eq!(VersionSpec::parse("  ").unwrap_err(), VersionParseError::Empty);
        assert!(matches!(
            VersionSpec::parse("[1.0,2.0").unwrap_err(),
            VersionParseError::Unbalanced(_)
        ));
        assert!(matches!(
            VersionSpec::parse("1.0]").unwrap_err(),
            VersionParseError::Unbalanced(_)
        ));
        assert!(matches!(
            VersionSpec::parse("(1.0)").unwrap_err(),
            VersionParseError::OpenSingleVersion(_)
        ));
        assert!(matches!(
            VersionSpec::parse("[2.0,1.0]").unwrap_err(),
            VersionParseError::ReversedBounds(_)
        ));
        assert!(matches!(
            VersionSpec::parse("[1.0,1.5,2.0]").unwrap_err(),
            VersionParseError::TooManyBounds(_)
        ));
        assert!(matches!(
            VersionSpec::parse("[1.0,1.0)").unwrap_err(),
            VersionParseError::IdenticalBounds(_)
        ));
        assert!(matches!(
            VersionSpec::parse("[1,3),[2,4)").unwrap_err(),
            VersionParseError::Overlap(_)
        ));
        assert!(matches!(
            VersionSpec::parse("[1,2),3.0").unwrap_err(),
            VersionParseError::MixedSet(_)
        ));
    }

    #[test]
    fn compatibility_heuristic() {
        assert!(is_compatible("1.0.0", "1.0.0").unwrap());
        assert!(is_compatible("[,1.0.0]", "1.0.0").unwrap());
        assert!(is_compatible("[1,2)", "1.1.0").unwrap());
        assert!(is_compatible("1.0.0", "1.1.0").unwrap());
        assert!(!is_compatible("[1,2)", "2.0").unwrap());
        assert!(!is_compatible("1.1", "1.0").unwrap());
        assert!(!is_compatible("1.1", "2.0").unwrap());
    }

    #[test]
    fn compatibility_ignores_incremental() {
        assert!(is_compatible("1.2.9", "1.2.0").unwrap());
    }

    #[test]
    fn compatibility_rejects_invalid_spec() {
        assert!(is_compatible("[1.0", "1.0").is_err());
    }
}
