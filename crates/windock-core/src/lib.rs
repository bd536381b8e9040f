//! Window-level dock icons for macOS.
//!
//! Enumerates live windows ([`windows`]), names and reconciles them with
//! on-disk helper applications ([`identity`]), manages those helpers and
//! their dock tiles ([`helpers`], [`dock`]), and routes helper clicks back
//! to the right window ([`activation`]).

pub mod activation;
mod command;
pub mod config;
pub mod dock;
pub mod errors;
pub mod escape;
pub mod events;
pub mod filter;
pub mod helpers;
pub mod identity;
pub mod logging;
pub mod windows;

pub use activation::{ActivationOutcome, ActivationRequest, ActivationRouter, AppActivator};
pub use config::{Config, WindockConfig};
pub use dock::{DefaultsDockRegistry, DockRegistry, MemoryDockRegistry};
pub use errors::{Permission, WindockError, WindockResult};
pub use filter::AppFilter;
pub use helpers::{HelperError, HelperManager, HelperRecord, LifecycleReport, LifecycleWarning};
pub use identity::{DynamicTitleRules, find_existing_helper, helper_name};
pub use logging::init_logging;
pub use windows::{Snapshot, WindowEnumerator, WindowRecord, WindowSource};
