//! Rule Manager for gitlab-reporter.
//!
//! Parses and serializes the rules text, matches page URLs against rules and
//! persists the text under the `rules` key.
//!
//! Text format: one rule per line, `url` then `profile`, separated by commas
//! and/or whitespace. Lines that do not yield both tokens are skipped.
//!
//! Rule ids are not part of the text. The ids handed out for the last saved
//! text are kept under `ruleIds` and reused while the text is unchanged.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::database::kv_store::{KeyValueStore, RULES_KEY, RULE_IDS_KEY};
use crate::types::errors::RuleError;
use crate::types::rule::{Rule, RuleList};

/// Trait defining rule persistence operations.
pub trait RuleManagerTrait {
    fn get_rules_text(&self) -> Result<String, RuleError>;
    fn save_rules_text(&mut self, text: &str) -> Result<(), RuleError>;
    fn load_rules(&self) -> Result<RuleList, RuleError>;
    fn save_rules(&mut self, rules: &RuleList) -> Result<(), RuleError>;
}

/// Splits rules text into rules, allocating a fresh id for each.
pub fn parse_rules(text: &str) -> Vec<Rule> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Rule> {
    let mut tokens = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());
    let url = tokens.next()?;
    let profile = tokens.next()?;
    Some(Rule::new(url, profile))
}

/// Writes one `"{url} {profile}"` line per rule, in list order.
pub fn serialize_rules(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(|rule| format!("{} {}", rule.url, rule.profile))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the first rule whose `url` is contained in `url`.
///
/// Containment is case-sensitive; there is no scoring, so an earlier, broader
/// rule shadows a later, more specific one. Rules with an empty `url` never match.
pub fn match_url<'r>(url: &str, rules: &'r [Rule]) -> Option<&'r Rule> {
    rules
        .iter()
        .find(|rule| !rule.url.is_empty() && url.contains(rule.url.as_str()))
}

/// Ids recorded for one version of the rules text.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRuleIds {
    text: String,
    ids: Vec<String>,
}

/// Rule persistence over a key/value store.
pub struct RuleManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> RuleManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    fn write(&mut self, text: &str, rules: &[Rule]) -> Result<(), RuleError> {
        let ids = StoredRuleIds {
            text: text.to_string(),
            ids: rules.iter().map(|rule| rule.id.clone()).collect(),
        };
        let ids_json = serde_json::to_string(&ids)
            .map_err(|e| RuleError::StorageError(e.to_string()))?;

        self.store.set(RULES_KEY, text)?;
        self.store.set(RULE_IDS_KEY, &ids_json)?;
        debug!("Saved {} rule(s)", rules.len());
        Ok(())
    }

    /// Ids for `text` if they were recorded for exactly this text.
    fn stored_ids(&self, text: &str, count: usize) -> Result<Option<Vec<String>>, RuleError> {
        let raw = match self.store.get(RULE_IDS_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str::<StoredRuleIds>(&raw) {
            Ok(stored) if stored.text == text && stored.ids.len() == count => Ok(Some(stored.ids)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!("Ignoring unreadable rule ids: {}", e);
                Ok(None)
            }
        }
    }
}

impl<'a> RuleManagerTrait for RuleManager<'a> {
    fn get_rules_text(&self) -> Result<String, RuleError> {
        Ok(self.store.get(RULES_KEY)?.unwrap_or_default())
    }

    /// Stores the text verbatim and records fresh ids for the rules it parses to.
    fn save_rules_text(&mut self, text: &str) -> Result<(), RuleError> {
        let rules = parse_rules(text);
        self.write(text, &rules)
    }

    fn load_rules(&self) -> Result<RuleList, RuleError> {
        let text = self.get_rules_text()?;
        let mut rules = parse_rules(&text);
        if let Some(ids) = self.stored_ids(&text, rules.len())? {
            for (rule, id) in rules.iter_mut().zip(ids) {
                rule.id = id;
            }
        }
        Ok(RuleList::from_rules(rules))
    }

    /// Serializes the list, keeping ids. Incomplete rules are left out of the
    /// text; a complete rule with a separator inside a token is rejected.
    fn save_rules(&mut self, rules: &RuleList) -> Result<(), RuleError> {
        let complete: Vec<Rule> = rules
            .rules()
            .iter()
            .filter(|rule| rule.is_complete())
            .cloned()
            .collect();
        for rule in &complete {
            rule.check_tokens()?;
        }
        self.write(&serialize_rules(&complete), &complete)
    }
}
