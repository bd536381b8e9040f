#[cfg(target_os = "macos")]
pub(crate) mod ax;
#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacWindowSource;
