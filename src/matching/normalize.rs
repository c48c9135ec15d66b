use anyhow::{Context, Result};
use regex::Regex;

/// Canonical comparison form of a team name.
///
/// Lowercases, spells out `&`, drops apostrophes and periods, turns other
/// punctuation into spaces and expands the word `st` to `state`.
pub struct NameNormalizer {
    dropped: Regex,
    separators: Regex,
}

impl NameNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dropped: Self::compile_regex(r"['’.]")?,
            separators: Self::compile_regex(r"[^a-z0-9]+")?,
        })
    }

    fn compile_regex(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).with_context(|| format!("Failed to compile regex {pattern}"))
    }

    pub fn normalize(&self, name: &str) -> String {
        let lower = name.to_lowercase().replace('&', " and ");
        let stripped = self.dropped.replace_all(&lower, "");
        let spaced = self.separators.replace_all(&stripped, " ");

        spaced
            .split_whitespace()
            .map(|word| if word == "st" { "state" } else { word })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(name: &str) -> String {
        NameNormalizer::new().unwrap().normalize(name)
    }

    #[test]
    fn strips_case_and_punctuation() {
        assert_eq!(normalize("  St. John's  "), "state johns");
        assert_eq!(normalize("Texas A&M-Corpus Christi"), "texas a and m corpus christi");
    }

    #[test]
    fn st_and_state_normalize_alike() {
        assert_eq!(normalize("Kansas St."), normalize("Kansas State"));
        assert_eq!(normalize("Stanford"), "stanford");
    }
}
