//! Construction of the platform services commands run against.
//!
//! Window and activation services exist only on macOS; elsewhere they
//! return `Unsupported` so that filesystem-only commands keep working.

use tracing::warn;

use windock_core::activation::{ActivationError, AppActivator};
use windock_core::config::{Config, WindockConfig};
use windock_core::dock::DefaultsDockRegistry;
use windock_core::filter::AppFilter;
use windock_core::helpers::HelperManager;
use windock_core::identity::DynamicTitleRules;
use windock_core::windows::{WindowError, WindowSource};

#[cfg(target_os = "macos")]
pub(crate) type Locator = windock_core::helpers::WorkspaceAppLocator;
#[cfg(not(target_os = "macos"))]
pub(crate) type Locator = windock_core::helpers::NoAppLocator;

pub(crate) type Manager = HelperManager<DefaultsDockRegistry, Locator>;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but tells the user on
/// stderr and logs `cli.config.load_failed`.
pub(crate) fn load_config_with_warning() -> WindockConfig {
    match WindockConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.windock/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            WindockConfig::default()
        }
    }
}

/// Load the application filter, falling back to built-in defaults when the
/// preferences file cannot be read.
pub(crate) fn load_filter(config: &Config, file_config: &WindockConfig) -> AppFilter {
    let path = config.preferences_file();
    match AppFilter::load(&path, file_config) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!(
                "Warning: Could not read preferences at '{}': {}. Using defaults.",
                path.display(),
                e
            );
            warn!(
                event = "cli.preferences.load_failed",
                path = %path.display(),
                error = %e
            );
            AppFilter::default()
        }
    }
}

pub(crate) fn helper_manager(
    config: &Config,
    file_config: &WindockConfig,
) -> Result<Manager, Box<dyn std::error::Error>> {
    let registry = DefaultsDockRegistry::new()?;
    let manager = HelperManager::new(config.helpers_dir(), registry, Locator::default())
        .with_rules(DynamicTitleRules::from(&file_config.dynamic_titles));
    Ok(manager)
}

pub(crate) fn window_source() -> Result<Box<dyn WindowSource>, WindowError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(windock_core::windows::MacWindowSource::new()))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Err(WindowError::Unsupported)
    }
}

pub(crate) fn app_activator() -> Result<Box<dyn AppActivator>, ActivationError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(windock_core::activation::MacAppActivator::new()))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Err(ActivationError::Unsupported)
    }
}
