//! Matching required artifacts against the runtime classpath.

use std::cmp::Reverse;

use depcov_core::artifact::Artifact;
use depcov_core::runtime::RuntimeClasspath;
use depcov_resolver::version::{is_compatible, MavenVersion, VersionParseError, VersionSpec};

/// Outcome of looking up one required artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A runtime artifact with the same identity and a compatible version.
    Compatible(Artifact),
    /// Same-identity runtime artifacts exist, none with a compatible version.
    Incompatible {
        candidates: Vec<Artifact>,
        closest: Artifact,
    },
    /// Same-identity runtime artifacts exist but the required version does
    /// not parse.
    InvalidVersion(VersionParseError),
    /// No runtime artifact with the same identity.
    Absent,
}

/// Runtime artifacts equal to `required` disregarding version, sorted and
/// without duplicates.
pub fn identity_candidates(required: &Artifact, runtime: &RuntimeClasspath) -> Vec<Artifact> {
    let mut candidates: Vec<Artifact> = runtime.candidates_for(required).cloned().collect();
    candidates.sort();
    candidates.dedup();
    candidates
}

/// Whether any runtime artifact has the same identity, whatever its version.
pub fn contains_identity(required: &Artifact, runtime: &RuntimeClasspath) -> bool {
    runtime.candidates_for(required).next().is_some()
}

/// Look `required` up in `runtime`, honoring version compatibility.
pub fn match_compatible(required: &Artifact, runtime: &RuntimeClasspath) -> MatchOutcome {
    let candidates = identity_candidates(required, runtime);
    if candidates.is_empty() {
        return MatchOutcome::Absent;
    }
    let mut incompatible = Vec::new();
    for candidate in candidates {
        match is_compatible(&required.version, &candidate.version) {
            Ok(true) => return MatchOutcome::Compatible(candidate),
            Ok(false) => incompatible.push(candidate),
            Err(e) => return MatchOutcome::InvalidVersion(e),
        }
    }
    match closest_candidate(required, &incompatible).cloned() {
        Some(closest) => MatchOutcome::Incompatible {
            candidates: incompatible,
            closest,
        },
        None => MatchOutcome::Absent,
    }
}

/// Candidate nearest to the required version: smallest major distance, then
/// smallest minor distance, then the higher version.
pub fn closest_candidate<'a>(required: &Artifact, candidates: &'a [Artifact]) -> Option<&'a Artifact> {
    let reference = reference_version(&required.version);
    candidates.iter().min_by_key(|candidate| {
        let version = MavenVersion::parse(&candidate.version);
        let distance = reference.as_ref().map(|r| {
            (
                r.major().abs_diff(version.major()),
                r.minor().abs_diff(version.minor()),
            )
        });
        (distance, Reverse(version))
    })
}

/// The version a spec is anchored on: its recommended version, or the
/// lower (else upper) bound of its first interval.
fn reference_version(spec: &str) -> Option<MavenVersion> {
    let spec = VersionSpec::parse(spec).ok()?;
    if let Some(recommended) = spec.recommended {
        return Some(recommended);
    }
    let first = spec.restrictions.into_iter().next()?;
    first.lower.or(first.upper).map(|bound| bound.version)
}
