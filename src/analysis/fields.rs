//! Text-based field presence checks.
//!
//! A field counts as present when any of its keywords occurs anywhere in the
//! recognized page text, ignoring case. There is no positional or contextual
//! validation, so an unrelated "date" in the body satisfies the `date` field.

use serde::{Deserialize, Serialize};

/// One required field and the keywords that satisfy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Identifier reported in `missing_fields` (e.g. `boss_name`)
    pub id: String,
    /// Accepted spellings; any single match marks the field present
    pub keywords: Vec<String>,
}

impl FieldRule {
    pub fn new(id: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Lowercase keywords so matching against lowercased text is case-insensitive.
    pub fn normalized(self) -> Self {
        Self {
            id: self.id,
            keywords: self.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Expects `text` to already be lowercased.
    fn is_satisfied_by(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && text.contains(keyword.as_str()))
    }
}

/// Rules for the medical justification form.
pub fn default_field_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("name", &["name"]),
        FieldRule::new("boss_name", &["boss name", "boss:", "manager"]),
        FieldRule::new("date", &["date"]),
        FieldRule::new("employee_id", &["employee id", "employee id:"]),
        FieldRule::new("reason", &["reason"]),
    ]
}

/// Return the ids of every rule none of whose keywords appear in `text`,
/// in rule order.
pub fn missing_fields(text: &str, rules: &[FieldRule]) -> Vec<String> {
    let text_lower = text.to_lowercase();

    rules
        .iter()
        .filter(|rule| !rule.is_satisfied_by(&text_lower))
        .map(|rule| rule.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        let text = "Name: Jane\nBoss name: Carl\nDate: 2024-01-01\nEmployee ID: 42\nReason: flu";
        assert!(missing_fields(text, &default_field_rules()).is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rules = vec![FieldRule::new("name", &["name"])];
        assert!(missing_fields("NAME: JOHN", &rules).is_empty());
        assert!(missing_fields("NaMe", &rules).is_empty());
    }

    #[test]
    fn test_uppercase_keywords_are_normalized() {
        let rules = vec![FieldRule {
            id: "reason".to_string(),
            keywords: vec!["REASON".to_string()],
        }
        .normalized()];
        assert!(missing_fields("reason for absence", &rules).is_empty());
    }

    #[test]
    fn test_boss_name_alternatives() {
        let rules = default_field_rules();
        for text in ["Boss name: A", "boss: A", "Manager A"] {
            let missing = missing_fields(text, &rules);
            assert!(!missing.contains(&"boss_name".to_string()), "text {:?} should satisfy boss_name", text);
        }
        assert!(missing_fields("bossname", &rules).contains(&"boss_name".to_string()));
    }

    #[test]
    fn test_name_and_date_example() {
        let missing = missing_fields("Name: John, Date: 2024-01-01", &default_field_rules());
        assert_eq!(missing, vec!["boss_name", "employee_id", "reason"]);
    }

    #[test]
    fn test_empty_text_reports_every_rule_in_order() {
        let missing = missing_fields("", &default_field_rules());
        assert_eq!(missing, vec!["name", "boss_name", "date", "employee_id", "reason"]);
    }

    #[test]
    fn test_substring_false_positive_is_accepted() {
        // "update" contains "date"
        let missing = missing_fields("please update", &default_field_rules());
        assert!(!missing.contains(&"date".to_string()));
    }

    #[test]
    fn test_rule_without_keywords_is_always_missing() {
        let rules = vec![FieldRule::new("stamp", &[]), FieldRule::new("blank", &[""])];
        assert_eq!(missing_fields("anything at all", &rules), vec!["stamp", "blank"]);
    }
}
