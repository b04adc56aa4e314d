use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::RuleError;

/// A URL-substring to profile-name mapping.
///
/// `id` only identifies the rule in editors; it plays no part in matching and
/// is not written to the rules text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub url: String,
    pub profile: String,
}

impl Rule {
    /// Creates a rule with a freshly allocated id.
    pub fn new(url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            profile: profile.into(),
        }
    }

    /// Returns true when both tokens are present.
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.profile.is_empty()
    }

    /// Fails if either token contains a rules-text separator.
    pub fn check_tokens(&self) -> Result<(), RuleError> {
        check_token("url", &self.url)?;
        check_token("profile", &self.profile)
    }
}

/// Commas and whitespace split rule lines, so they cannot appear inside a token.
fn check_token(field: &str, token: &str) -> Result<(), RuleError> {
    if token.contains(|c: char| c == ',' || c.is_whitespace()) {
        return Err(RuleError::InvalidRule(format!(
            "{} '{}' contains a comma or whitespace",
            field, token
        )));
    }
    Ok(())
}

/// An ordered, editable list of rules. Order decides which rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends a rule and returns its id.
    pub fn push(&mut self, url: &str, profile: &str) -> Result<String, RuleError> {
        let rule = Rule::new(url, profile);
        rule.check_tokens()?;
        let id = rule.id.clone();
        self.rules.push(rule);
        Ok(id)
    }

    /// Removes the rule with the given id.
    pub fn remove(&mut self, id: &str) -> Result<Rule, RuleError> {
        let index = self.position(id)?;
        Ok(self.rules.remove(index))
    }

    /// Replaces the url and profile of a rule, keeping its id and position.
    pub fn update(&mut self, id: &str, url: &str, profile: &str) -> Result<(), RuleError> {
        let index = self.position(id)?;
        check_token("url", url)?;
        check_token("profile", profile)?;
        let rule = &mut self.rules[index];
        rule.url = url.to_string();
        rule.profile = profile.to_string();
        Ok(())
    }

    /// Moves the rule at `from` so that it ends up at index `to`.
    pub fn move_rule(&mut self, from: usize, to: usize) -> Result<(), RuleError> {
        let len = self.rules.len();
        if from >= len {
            return Err(RuleError::InvalidIndex(from));
        }
        if to >= len {
            return Err(RuleError::InvalidIndex(to));
        }
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, RuleError> {
        self.rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))
    }
}
