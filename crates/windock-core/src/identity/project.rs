use crate::config::DynamicTitlesConfig;

/// Derive a project label from a window title.
///
/// Separators are tried in order; the first one that splits the title into
/// at least two segments decides. With three or more segments the project
/// is the second-to-last ("file - project - App"), with exactly two it is
/// the first ("project - App").
pub fn extract_project_name<S: AsRef<str>>(title: &str, separators: &[S]) -> Option<String> {
    for separator in separators {
        let separator = separator.as_ref();
        if separator.is_empty() {
            continue;
        }
        let segments: Vec<&str> = title.split(separator).collect();
        let project = match segments.len() {
            0 | 1 => continue,
            2 => segments[0],
            n => segments[n - 2],
        };
        let project = project.trim();
        return (!project.is_empty()).then(|| project.to_string());
    }
    None
}

/// Which applications have volatile titles, and how to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicTitleRules {
    patterns: Vec<String>,
    separators: Vec<String>,
}

impl DynamicTitleRules {
    pub fn new(patterns: Vec<String>, separators: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| p.to_lowercase()).collect(),
            separators,
        }
    }

    /// True when the bundle identifier contains one of the patterns,
    /// ignoring case.
    pub fn is_dynamic(&self, bundle_id: &str) -> bool {
        let bundle_id = bundle_id.to_lowercase();
        self.patterns.iter().any(|p| bundle_id.contains(p.as_str()))
    }

    pub fn project_name(&self, title: &str) -> Option<String> {
        extract_project_name(title, &self.separators)
    }

    /// Project label to capture for a window, if its application is dynamic.
    pub fn project_for(&self, bundle_id: Option<&str>, title: &str) -> Option<String> {
        bundle_id
            .filter(|b| self.is_dynamic(b))
            .and_then(|_| self.project_name(title))
    }
}

impl Default for DynamicTitleRules {
    fn default() -> Self {
        Self::from(&DynamicTitlesConfig::default())
    }
}

impl From<&DynamicTitlesConfig> for DynamicTitleRules {
    fn from(config: &DynamicTitlesConfig) -> Self {
        Self::new(config.patterns.clone(), config.separators.clone())
    }
}
