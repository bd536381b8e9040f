use std::path::Path;

use tracing::debug;
use url::Url;

use super::errors::DockError;
use super::tiles::DockTile;

/// The dock's persisted tile list.
///
/// Mutations land in the preference store only; nothing is visible until
/// [`DockRegistry::refresh`] makes the dock reload.
pub trait DockRegistry {
    /// Append a tile pointing at `path`.
    fn add_tile(&mut self, path: &Path) -> Result<(), DockError>;

    /// Current tiles in list order.
    fn tiles(&mut self) -> Result<Vec<DockTile>, DockError>;

    /// Delete tiles by index. Indices are applied in the order given, so
    /// callers pass them in descending order.
    fn delete_tiles(&mut self, indices: &[usize]) -> Result<(), DockError>;

    /// Force the dock to reload its persisted configuration.
    fn refresh(&mut self) -> Result<(), DockError>;
}

impl<R: DockRegistry + ?Sized> DockRegistry for &mut R {
    fn add_tile(&mut self, path: &Path) -> Result<(), DockError> {
        (**self).add_tile(path)
    }

    fn tiles(&mut self) -> Result<Vec<DockTile>, DockError> {
        (**self).tiles()
    }

    fn delete_tiles(&mut self, indices: &[usize]) -> Result<(), DockError> {
        (**self).delete_tiles(indices)
    }

    fn refresh(&mut self) -> Result<(), DockError> {
        (**self).refresh()
    }
}

impl<R: DockRegistry + ?Sized> DockRegistry for Box<R> {
    fn add_tile(&mut self, path: &Path) -> Result<(), DockError> {
        (**self).add_tile(path)
    }

    fn tiles(&mut self) -> Result<Vec<DockTile>, DockError> {
        (**self).tiles()
    }

    fn delete_tiles(&mut self, indices: &[usize]) -> Result<(), DockError> {
        (**self).delete_tiles(indices)
    }

    fn refresh(&mut self) -> Result<(), DockError> {
        (**self).refresh()
    }
}

/// Delete every tile matching `predicate`, highest index first.
///
/// Returns the number of tiles deleted.
pub fn remove_tiles_where<R, F>(registry: &mut R, predicate: F) -> Result<usize, DockError>
where
    R: DockRegistry + ?Sized,
    F: Fn(&DockTile) -> bool,
{
    let mut indices: Vec<usize> = registry
        .tiles()?
        .iter()
        .filter(|&tile| predicate(tile))
        .map(|tile| tile.index)
        .collect();

    if indices.is_empty() {
        return Ok(0);
    }

    indices.sort_unstable_by(|a, b| b.cmp(a));
    debug!(
        event = "core.dock.tiles_delete_started",
        count = indices.len()
    );
    registry.delete_tiles(&indices)?;
    Ok(indices.len())
}

/// In-memory registry for tests and dry runs.
///
/// Tiles are stored as `file://` URLs, the way the dock records them.
#[derive(Debug, Default, Clone)]
pub struct MemoryDockRegistry {
    urls: Vec<Option<String>>,
    pub refresh_count: usize,
    pub deleted_indices: Vec<usize>,
    pub fail_add: bool,
    pub fail_remove: bool,
    pub fail_refresh: bool,
}

impl MemoryDockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tile with an arbitrary URL string.
    pub fn push_url(&mut self, url: impl Into<String>) {
        self.urls.push(Some(url.into()));
    }

    /// Append a spacer tile.
    pub fn push_spacer(&mut self) {
        self.urls.push(None);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn snapshot(&self) -> Vec<DockTile> {
        self.urls
            .iter()
            .enumerate()
            .map(|(index, url)| DockTile {
                index,
                url: url.clone(),
            })
            .collect()
    }
}

impl DockRegistry for MemoryDockRegistry {
    fn add_tile(&mut self, path: &Path) -> Result<(), DockError> {
        if self.fail_add {
            return Err(DockError::ToolFailed {
                tool: "memory".to_string(),
                message: "add rejected".to_string(),
            });
        }
        let url = Url::from_directory_path(path)
            .map(String::from)
            .unwrap_or_else(|_| path.display().to_string());
        self.urls.push(Some(url));
        Ok(())
    }

    fn tiles(&mut self) -> Result<Vec<DockTile>, DockError> {
        Ok(self.snapshot())
    }

    fn delete_tiles(&mut self, indices: &[usize]) -> Result<(), DockError> {
        if self.fail_remove {
            return Err(DockError::ToolFailed {
                tool: "memory".to_string(),
                message: "delete rejected".to_string(),
            });
        }
        for &index in indices {
            if index >= self.urls.len() {
                return Err(DockError::InvalidIndex {
                    index,
                    count: self.urls.len(),
                });
            }
            self.urls.remove(index);
            self.deleted_indices.push(index);
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), DockError> {
        if self.fail_refresh {
            return Err(DockError::ToolFailed {
                tool: "memory".to_string(),
                message: "refresh rejected".to_string(),
            });
        }
        self.refresh_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn helpers_dir() -> PathBuf {
        PathBuf::from("/Users/me/Library/Application Support/WindowsOnDock/Helpers")
    }

    #[test]
    fn test_memory_registry_stores_file_urls() {
        let mut registry = MemoryDockRegistry::new();
        registry
            .add_tile(&helpers_dir().join("WD_a b.app"))
            .unwrap();

        let tiles = registry.tiles().unwrap();
        let url = tiles[0].url.as_deref().unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.contains("WD_a%20b.app"));
        assert!(tiles[0].points_at(&helpers_dir(), "WD_a b.app"));
    }

    #[test]
    fn test_remove_tiles_where_deletes_descending() {
        let mut registry = MemoryDockRegistry::new();
        registry.push_url("file:///Applications/Safari.app/");
        registry.add_tile(&helpers_dir().join("WD_one.app")).unwrap();
        registry.push_spacer();
        registry.add_tile(&helpers_dir().join("WD_two.app")).unwrap();
        registry.push_url("file:///Applications/Mail.app/");

        let dir = helpers_dir();
        let removed = remove_tiles_where(&mut registry, |t| t.points_at_any_helper(&dir)).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(registry.deleted_indices, vec![3, 1]);
        let remaining: Vec<Option<String>> =
            registry.tiles().unwrap().into_iter().map(|t| t.url).collect();
        assert_eq!(
            remaining,
            vec![
                Some("file:///Applications/Safari.app/".to_string()),
                None,
                Some("file:///Applications/Mail.app/".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_tiles_where_without_matches_is_noop() {
        let mut registry = MemoryDockRegistry::new();
        registry.push_url("file:///Applications/Safari.app/");
        assert_eq!(remove_tiles_where(&mut registry, |_| true).unwrap(), 1);
        assert_eq!(remove_tiles_where(&mut registry, |_| true).unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_tiles() {
        let mut registry = MemoryDockRegistry::new();
        registry.add_tile(&helpers_dir().join("WD_one.app")).unwrap();
        registry.fail_remove = true;

        let dir = helpers_dir();
        assert!(remove_tiles_where(&mut registry, |t| t.points_at_any_helper(&dir)).is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.deleted_indices.is_empty());
    }

    #[test]
    fn test_invalid_index_is_rejected() {
        let mut registry = MemoryDockRegistry::new();
        let err = registry.delete_tiles(&[0]).unwrap_err();
        assert!(matches!(err, DockError::InvalidIndex { index: 0, count: 0 }));
    }

    #[test]
    fn test_refresh_counts_and_failures() {
        let mut registry = MemoryDockRegistry::new();
        registry.refresh().unwrap();
        registry.fail_refresh = true;
        assert!(registry.refresh().is_err());
        assert_eq!(registry.refresh_count, 1);
    }
}
