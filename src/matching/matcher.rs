use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::normalize::NameNormalizer;
use crate::domain::{GameRecord, NameOverrides};

/// Which rule resolved a name, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Override,
    Exact,
    NormalizedExact,
    Prefix,
    MascotStripped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub canonical: String,
    pub rule: MatchRule,
}

/// Resolves feed team names to canonical rating-table names.
///
/// Never invents a team: a name that is unknown or matches more than one
/// candidate comes back unresolved and is left for manual override.
pub struct TeamNameMatcher {
    normalizer: NameNormalizer,
    /// normalized form -> canonical names sharing it
    canonical: BTreeMap<String, Vec<String>>,
    overrides: NameOverrides,
    fuzzy: bool,
}

impl TeamNameMatcher {
    pub fn new<I, S>(canonical_names: I, overrides: &NameOverrides, fuzzy: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let normalizer = NameNormalizer::new()?;
        let mut canonical: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in canonical_names {
            let name = name.into();
            canonical
                .entry(normalizer.normalize(&name))
                .or_default()
                .push(name);
        }

        Ok(Self {
            normalizer,
            canonical,
            overrides: overrides.clone(),
            fuzzy,
        })
    }

    pub fn resolve(&self, name: &str) -> Option<NameMatch> {
        if let Some(found) = self.by_override(name) {
            return Some(found);
        }
        if self.is_canonical(name) {
            return Some(NameMatch {
                canonical: name.to_string(),
                rule: MatchRule::Exact,
            });
        }

        let normalized = self.normalizer.normalize(name);
        if normalized.is_empty() {
            return None;
        }

        let found = self
            .unique(&normalized)
            .map(|c| (c, MatchRule::NormalizedExact))
            .or_else(|| self.fuzzy_match(&normalized))?;

        Some(NameMatch {
            canonical: found.0,
            rule: found.1,
        })
    }

    /// Rewrite resolvable names to canonical; unresolved names pass through
    pub fn resolve_games(&self, games: &[GameRecord]) -> Vec<GameRecord> {
        games
            .iter()
            .map(|game| GameRecord {
                home_team: self.canonical_or_raw(&game.home_team),
                away_team: self.canonical_or_raw(&game.away_team),
                ..game.clone()
            })
            .collect()
    }

    fn canonical_or_raw(&self, name: &str) -> String {
        match self.resolve(name) {
            Some(found) => {
                if found.rule != MatchRule::Exact {
                    debug!("Matched '{}' -> '{}' ({:?})", name, found.canonical, found.rule);
                }
                found.canonical
            }
            None => name.to_string(),
        }
    }

    fn by_override(&self, name: &str) -> Option<NameMatch> {
        let target = self.overrides.get(name)?;
        if !self.is_canonical(target) {
            warn!("Override '{}' -> '{}' points at an unknown team", name, target);
            return None;
        }
        Some(NameMatch {
            canonical: target.clone(),
            rule: MatchRule::Override,
        })
    }

    fn fuzzy_match(&self, normalized: &str) -> Option<(String, MatchRule)> {
        if !self.fuzzy {
            return None;
        }
        self.by_prefix(normalized)
            .map(|c| (c, MatchRule::Prefix))
            .or_else(|| self.by_mascot_stripping(normalized).map(|c| (c, MatchRule::MascotStripped)))
    }

    /// Feed name is a leading word-run of exactly one canonical name
    fn by_prefix(&self, normalized: &str) -> Option<String> {
        let prefix = format!("{normalized} ");
        let mut hits = self
            .canonical
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .flat_map(|(_, names)| names.iter());

        let first = hits.next()?;
        match hits.next() {
            Some(_) => None,
            None => Some(first.clone()),
        }
    }

    /// Drop trailing words (the mascot) until one canonical name matches
    fn by_mascot_stripping(&self, normalized: &str) -> Option<String> {
        let words: Vec<&str> = normalized.split(' ').collect();
        (1..words.len())
            .rev()
            .find_map(|len| self.unique(&words[..len].join(" ")))
    }

    fn unique(&self, normalized: &str) -> Option<String> {
        match self.canonical.get(normalized).map(Vec::as_slice) {
            Some([only]) => Some(only.clone()),
            _ => None,
        }
    }

    fn is_canonical(&self, name: &str) -> bool {
        self.canonical
            .get(&self.normalizer.normalize(name))
            .is_some_and(|names| names.iter().any(|n| n == name))
    }
}
