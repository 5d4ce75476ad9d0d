//! What the destination needs from the host analytics dispatcher.

use talkable_core::types::Identity;

/// Host services the destination relies on. The host owns script injection,
/// the current user and the page location; the destination only asks.
pub trait HostContext: Send + Sync {
    /// Current user state (id and traits).
    fn user(&self) -> Identity;

    /// Path of the page currently shown, e.g. `/share`.
    fn page_path(&self) -> String;

    /// Ask the host to inject a script tag. The host reports completion by
    /// calling the destination's `on_ready`.
    fn load_script(&self, src: &str);

    /// Whether a global with this name is defined (the vendor script sets one
    /// once it has loaded).
    fn global_defined(&self, name: &str) -> bool;
}
