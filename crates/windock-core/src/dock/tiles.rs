use std::path::{Path, PathBuf};

use serde::Serialize;
use url::Url;

use crate::identity::HELPER_PREFIX;

/// One entry of the dock's persistent application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockTile {
    /// Position in the persistent list.
    pub index: usize,
    /// `_CFURLString` of the tile; `None` for spacers and other tiles
    /// without file data.
    pub url: Option<String>,
}

impl DockTile {
    #[cfg(test)]
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: Some(url.into()),
        }
    }

    /// Filesystem path the tile refers to.
    ///
    /// Accepts both `file://` URLs (percent-decoded) and plain paths.
    pub fn path(&self) -> Option<PathBuf> {
        let url = self.url.as_deref()?;
        if url.starts_with("file:") {
            return Url::parse(url).ok()?.to_file_path().ok();
        }
        url.starts_with('/').then(|| PathBuf::from(url))
    }

    /// True when the tile points directly at an entry of `helpers_dir`
    /// named `artifact_name`.
    pub fn points_at(&self, helpers_dir: &Path, artifact_name: &str) -> bool {
        self.helper_file_name(helpers_dir)
            .is_some_and(|name| name == artifact_name)
    }

    /// True when the tile points at any helper artifact in `helpers_dir`.
    pub fn points_at_any_helper(&self, helpers_dir: &Path) -> bool {
        self.helper_file_name(helpers_dir)
            .is_some_and(|name| name.starts_with(HELPER_PREFIX))
    }

    fn helper_file_name(&self, helpers_dir: &Path) -> Option<String> {
        let path = self.path()?;
        if path.parent()? != helpers_dir {
            return None;
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Parse `PlistBuddy -c "Print :persistent-apps"` output into tiles.
///
/// Top-level entries are the dictionaries opened at four spaces of
/// indentation; each contributes one tile in order, whether or not it
/// carries a URL.
pub fn parse_persistent_apps(output: &str) -> Vec<DockTile> {
    let mut tiles: Vec<DockTile> = Vec::new();

    for line in output.lines() {
        if line.trim_end() == "    Dict {" {
            tiles.push(DockTile {
                index: tiles.len(),
                url: None,
            });
            continue;
        }

        let Some(current) = tiles.last_mut() else {
            continue;
        };
        if current.url.is_some() {
            continue;
        }
        if let Some(value) = line.trim_start().strip_prefix("_CFURLString = ") {
            current.url = Some(value.trim_end().to_string());
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINT_OUTPUT: &str = "\
Array {
    Dict {
        GUID = 1234
        tile-data = Dict {
            file-data = Dict {
                _CFURLString = file:///System/Applications/Mail.app/
                _CFURLStringType = 15
            }
            file-label = Mail
        }
        tile-type = file-tile
    }
    Dict {
        tile-data = Dict {
        }
        tile-type = spacer-tile
    }
    Dict {
        tile-data = Dict {
            file-data = Dict {
                _CFURLString = /Users/me/Library/Application Support/WindowsOnDock/Helpers/WD_notes.app
                _CFURLStringType = 0
            }
        }
    }
    Dict {
        tile-data = Dict {
            file-data = Dict {
                _CFURLString = file:///Users/me/Library/Application%20Support/WindowsOnDock/Helpers/WD_main%20-%20proj.app/
                _CFURLStringType = 15
            }
        }
    }
}
";

    fn helpers_dir() -> PathBuf {
        PathBuf::from("/Users/me/Library/Application Support/WindowsOnDock/Helpers")
    }

    #[test]
    fn test_parse_keeps_positions_including_spacers() {
        let tiles = parse_persistent_apps(PRINT_OUTPUT);
        assert_eq!(tiles.len(), 4);
        assert_eq!(
            tiles[0].url.as_deref(),
            Some("file:///System/Applications/Mail.app/")
        );
        assert_eq!(tiles[1].url, None);
        assert_eq!(tiles[3].index, 3);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_persistent_apps("").is_empty());
        assert!(parse_persistent_apps("Array {\n}\n").is_empty());
    }

    #[test]
    fn test_plain_path_tile_matches() {
        let tiles = parse_persistent_apps(PRINT_OUTPUT);
        assert!(tiles[2].points_at(&helpers_dir(), "WD_notes.app"));
        assert!(!tiles[2].points_at(&helpers_dir(), "WD_other.app"));
    }

    #[test]
    fn test_file_url_tile_is_percent_decoded() {
        let tiles = parse_persistent_apps(PRINT_OUTPUT);
        assert_eq!(
            tiles[3].path(),
            Some(helpers_dir().join("WD_main - proj.app"))
        );
        assert!(tiles[3].points_at(&helpers_dir(), "WD_main - proj.app"));
    }

    #[test]
    fn test_points_at_any_helper() {
        let tiles = parse_persistent_apps(PRINT_OUTPUT);
        let matched: Vec<usize> = tiles
            .iter()
            .filter(|t| t.points_at_any_helper(&helpers_dir()))
            .map(|t| t.index)
            .collect();
        assert_eq!(matched, vec![2, 3]);
    }

    #[test]
    fn test_tiles_outside_helpers_dir_do_not_match() {
        let tile = DockTile::new(0, "/Applications/WD_fake.app");
        assert!(!tile.points_at_any_helper(&helpers_dir()));

        let nested = DockTile::new(0, format!("{}/sub/WD_x.app", helpers_dir().display()));
        assert!(!nested.points_at_any_helper(&helpers_dir()));
    }

    #[test]
    fn test_unparseable_url_has_no_path() {
        assert_eq!(DockTile::new(0, "relative/path.app").path(), None);
        assert_eq!(DockTile::new(0, "file://[bad").path(), None);
    }
}
