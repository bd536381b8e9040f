use crate::windows::{PLACEHOLDER_TITLE, UNTITLED_TITLE, WindowRecord};

/// Namespace tag carried by every helper name.
pub const HELPER_PREFIX: &str = "WD_";

/// Directory extension of a helper artifact.
pub const HELPER_EXTENSION: &str = "app";

/// Maximum length in characters of a helper name after the prefix.
pub const MAX_HELPER_NAME_CHARS: usize = 50;

/// Make a window title safe for use as a file name.
///
/// `/`, `:` and `\` become `-`, brackets are dropped, and the result is
/// truncated to [`MAX_HELPER_NAME_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .map(|c| match c {
            '/' | ':' | '\\' => '-',
            other => other,
        })
        .take(MAX_HELPER_NAME_CHARS)
        .collect()
}

/// Deterministic helper name for a window title.
///
/// Empty, placeholder and bare "Untitled" titles fall back to
/// `Window_<window_number>`, as do titles that sanitize to nothing but
/// whitespace (`"[]"`, `"  "`), which would otherwise yield a bare `WD_`
/// artifact shared by every such window. Identical titles produce identical
/// names.
pub fn helper_name(title: &str, window_number: u32) -> String {
    let fallback = title.is_empty() || title == PLACEHOLDER_TITLE || title == UNTITLED_TITLE;
    let sanitized = if fallback {
        String::new()
    } else {
        sanitize_title(title)
    };

    if sanitized.trim().is_empty() {
        format!("{}Window_{}", HELPER_PREFIX, window_number)
    } else {
        format!("{}{}", HELPER_PREFIX, sanitized)
    }
}

/// [`helper_name`] for an enumerated window.
pub fn helper_name_for(window: &WindowRecord) -> String {
    helper_name(&window.title, window.window_number)
}

/// File name of the artifact directory for a helper name.
pub fn artifact_name(helper_name: &str) -> String {
    format!("{}.{}", helper_name, HELPER_EXTENSION)
}

/// True for file names that look like helper artifacts.
pub fn is_helper_artifact_name(file_name: &str) -> bool {
    file_name.starts_with(HELPER_PREFIX)
        && file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| ext == HELPER_EXTENSION && stem.len() > HELPER_PREFIX.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_path_hostile_characters() {
        assert_eq!(
            sanitize_title("src/main.rs: [dirty] \\ proj"),
            "src-main.rs- dirty - proj"
        );
    }

    #[test]
    fn test_sanitized_names_never_contain_hostile_characters() {
        let titles = [
            "a/b/c",
            "[[[]]]:::///\\\\\\",
            "C:\\Users\\me\\file.txt",
            "[No Title] but longer: /tmp/x",
            "https://example.com/path?q=[1]",
        ];
        for title in titles {
            let name = helper_name(title, 3);
            let body = name.strip_prefix(HELPER_PREFIX).unwrap();
            assert!(
                !body.contains(['/', ':', '\\', '[', ']']),
                "hostile character left in {:?}",
                name
            );
            assert!(body.chars().count() <= MAX_HELPER_NAME_CHARS);
        }
    }

    #[test]
    fn test_truncates_by_characters_not_bytes() {
        let title = "é".repeat(80);
        let name = helper_name(&title, 1);
        assert_eq!(
            name.strip_prefix(HELPER_PREFIX).unwrap().chars().count(),
            MAX_HELPER_NAME_CHARS
        );
    }

    #[test]
    fn test_fallback_names_use_window_number() {
        assert_eq!(helper_name("Untitled", 42), "WD_Window_42");
        assert_eq!(helper_name("", 42), "WD_Window_42");
        assert_eq!(helper_name(PLACEHOLDER_TITLE, 42), "WD_Window_42");
        assert_eq!(helper_name("[]", 5), "WD_Window_5");
    }

    #[test]
    fn test_blank_after_sanitizing_uses_window_number() {
        assert_eq!(helper_name("   ", 3), "WD_Window_3");
        assert_eq!(helper_name("[ ]", 4), "WD_Window_4");
        assert_eq!(helper_name(" [x] ", 4), "WD_ x ");
    }

    #[test]
    fn test_disambiguated_untitled_keeps_its_own_name() {
        assert_eq!(helper_name("Untitled-7", 7), "WD_Untitled-7");
    }

    #[test]
    fn test_identical_titles_collide() {
        assert_eq!(helper_name("notes.txt", 1), helper_name("notes.txt", 2));
    }

    #[test]
    fn test_artifact_name_round_trip() {
        let name = artifact_name("WD_notes");
        assert_eq!(name, "WD_notes.app");
        assert!(is_helper_artifact_name(&name));
        assert!(!is_helper_artifact_name("WD_.app"));
        assert!(!is_helper_artifact_name("Safari.app"));
        assert!(!is_helper_artifact_name("WD_notes.txt"));
    }
}
