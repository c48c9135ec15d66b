use std::collections::{BTreeMap, HashMap, HashSet};

use log::info;

use super::errors::{BracketError, TemplateError};
use super::templates::builtin_templates;
use super::types::{BracketTemplate, SlotSource};

/// Catalog of validated tournament shapes, keyed by template id
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, BracketTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in template, each one validated
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self::new();
        for template in builtin_templates() {
            registry.register(template)?;
        }
        info!("Loaded {} bracket templates", registry.templates.len());
        Ok(registry)
    }

    pub fn register(&mut self, template: BracketTemplate) -> Result<(), TemplateError> {
        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::DuplicateTemplate(template.id));
        }
        validate_template(&template)?;
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&BracketTemplate, BracketError> {
        self.templates
            .get(id)
            .ok_or_else(|| BracketError::UnknownTemplate(id.to_string()))
    }

    pub fn list(&self) -> impl Iterator<Item = &BracketTemplate> {
        self.templates.values()
    }
}

pub fn validate_template(template: &BracketTemplate) -> Result<(), TemplateError> {
    let name = || template.id.clone();

    if template.rounds.is_empty() {
        return Err(TemplateError::Empty { template: name() });
    }

    // matchup id -> round it lives in
    let mut rounds_by_id: HashMap<&str, u32> = HashMap::new();
    let mut previous: Option<u32> = None;
    for round in &template.rounds {
        if round.matchups.is_empty() {
            return Err(TemplateError::EmptyRound {
                template: name(),
                round: round.round,
            });
        }
        if let Some(prev) = previous.filter(|&p| round.round <= p) {
            return Err(TemplateError::RoundOrder {
                template: name(),
                round: round.round,
                previous: prev,
            });
        }
        previous = Some(round.round);

        for slot in &round.matchups {
            if rounds_by_id.insert(&slot.id, round.round).is_some() {
                return Err(TemplateError::DuplicateMatchup {
                    template: name(),
                    matchup: slot.id.clone(),
                });
            }
        }
    }

    let mut seeds_seen = HashSet::new();
    let mut consumed = HashSet::new();
    for (round, slot) in template.slots() {
        for source in [&slot.top, &slot.bottom] {
            match source {
                SlotSource::Seed(seed) => {
                    if *seed == 0 || *seed > template.team_count {
                        return Err(TemplateError::SeedOutOfRange {
                            template: name(),
                            seed: *seed,
                            team_count: template.team_count,
                        });
                    }
                    if !seeds_seen.insert(*seed) {
                        return Err(TemplateError::DuplicateSeed {
                            template: name(),
                            seed: *seed,
                        });
                    }
                }
                SlotSource::WinnerOf(source_id) => {
                    let source_round = rounds_by_id.get(source_id.as_str()).ok_or_else(|| {
                        TemplateError::UnknownSource {
                            template: name(),
                            matchup: slot.id.clone(),
                            source_id: source_id.clone(),
                        }
                    })?;
                    if *source_round >= round.round {
                        return Err(TemplateError::SourceNotEarlier {
                            template: name(),
                            matchup: slot.id.clone(),
                            source_id: source_id.clone(),
                        });
                    }
                    if !consumed.insert(source_id.as_str()) {
                        return Err(TemplateError::SourceReused {
                            template: name(),
                            source_id: source_id.clone(),
                        });
                    }
                }
            }
        }
    }

    if let Some(seed) = (1..=template.team_count).find(|s| !seeds_seen.contains(s)) {
        return Err(TemplateError::MissingSeed {
            template: name(),
            seed,
        });
    }

    let finals = rounds_by_id
        .keys()
        .filter(|id| !consumed.contains(*id))
        .count();
    if finals != 1 {
        return Err(TemplateError::FinalCount {
            template: name(),
            finals,
        });
    }

    check_acyclic(template)
}

/// Depth-first search over `winner_of` edges
fn check_acyclic(template: &BracketTemplate) -> Result<(), TemplateError> {
    let edges: HashMap<&str, Vec<&str>> = template
        .slots()
        .map(|(_, slot)| {
            let sources = [&slot.top, &slot.bottom]
                .into_iter()
                .filter_map(SlotSource::source_id)
                .collect();
            (slot.id.as_str(), sources)
        })
        .collect();

    let mut done = HashSet::new();
    for (_, slot) in template.slots() {
        let mut on_path = HashSet::new();
        if let Some(matchup) = find_cycle(&edges, &slot.id, &mut on_path, &mut done) {
            return Err(TemplateError::Cycle {
                template: template.id.clone(),
                matchup: matchup.to_string(),
            });
        }
    }
    Ok(())
}

fn find_cycle<'a>(
    edges: &HashMap<&'a str, Vec<&'a str>>,
    node: &'a str,
    on_path: &mut HashSet<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<&'a str> {
    if done.contains(node) {
        return None;
    }
    if !on_path.insert(node) {
        return Some(node);
    }
    for next in edges.get(node).into_iter().flatten() {
        if let Some(hit) = find_cycle(edges, *next, on_path, done) {
            return Some(hit);
        }
    }
    on_path.remove(node);
    done.insert(node);
    None
}
