use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AppRuleConfig;

/// An application label and the bundle-identifier substrings it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRule {
    pub label: String,
    /// Lowercase substrings; a bundle identifier matches if it contains any.
    pub patterns: Vec<String>,
}

impl MatchRule {
    pub fn new<S: AsRef<str>>(label: impl Into<String>, patterns: &[S]) -> Self {
        Self {
            label: label.into(),
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, bundle_id: &str) -> bool {
        let bundle_id = bundle_id.to_lowercase();
        self.patterns.iter().any(|p| bundle_id.contains(p.as_str()))
    }
}

/// Labels enabled until the user changes them.
pub const DEFAULT_ENABLED_APPS: [&str; 5] = ["VSCode", "Sublime Text", "Xcode", "JetBrains", "iTerm"];

/// The known applications, in display order.
pub fn builtin_rules() -> Vec<MatchRule> {
    vec![
        MatchRule::new("VSCode", &["vscode", "microsoft.code"]),
        MatchRule::new("Sublime Text", &["sublimetext", "sublime"]),
        MatchRule::new("Xcode", &["xcode"]),
        MatchRule::new("JetBrains", &["jetbrains", "intellij", "pycharm", "webstorm"]),
        MatchRule::new("iTerm", &["iterm"]),
        MatchRule::new("Terminal", &["apple.terminal"]),
        MatchRule::new("Word", &["microsoft.word"]),
        MatchRule::new("PowerPoint", &["microsoft.powerpoint"]),
        MatchRule::new("Excel", &["microsoft.excel"]),
        MatchRule::new("TextEdit", &["textedit"]),
    ]
}

/// Built-in rules with configured `[apps.*]` entries applied: an entry with
/// a built-in label replaces its patterns, any other label is appended.
pub fn merged_rules(configured: &BTreeMap<String, AppRuleConfig>) -> Vec<MatchRule> {
    let mut rules = builtin_rules();
    for (label, rule) in configured {
        let replacement = MatchRule::new(label.clone(), &rule.patterns);
        match rules.iter_mut().find(|r| r.label == *label) {
            Some(existing) => *existing = replacement,
            None => rules.push(replacement),
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_matching_ignores_case() {
        let rule = MatchRule::new("VSCode", &["VSCode", "microsoft.code"]);
        assert!(rule.matches("com.microsoft.VSCode"));
        assert!(rule.matches("com.microsoft.VSCodeInsiders"));
        assert!(!rule.matches("com.apple.Terminal"));
    }

    #[test]
    fn test_builtin_labels_cover_defaults() {
        let rules = builtin_rules();
        for label in DEFAULT_ENABLED_APPS {
            assert!(rules.iter().any(|r| r.label == label), "missing {}", label);
        }
        assert_eq!(rules.len(), 10);
    }

    #[test]
    fn test_merged_rules_replace_and_extend() {
        let mut configured = BTreeMap::new();
        configured.insert(
            "Terminal".to_string(),
            AppRuleConfig {
                patterns: vec!["com.apple.Terminal".to_string()],
            },
        );
        configured.insert(
            "Zed".to_string(),
            AppRuleConfig {
                patterns: vec!["dev.zed".to_string()],
            },
        );

        let rules = merged_rules(&configured);
        assert_eq!(rules.len(), 11);
        let terminal = rules.iter().find(|r| r.label == "Terminal").unwrap();
        assert_eq!(terminal.patterns, vec!["com.apple.terminal"]);
        assert_eq!(rules.last().unwrap().label, "Zed");
    }
}
