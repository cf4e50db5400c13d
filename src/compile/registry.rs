//! Session-wide registry of verbatim raw scripts.

use std::collections::HashMap;

use crate::core::PercolateError;

/// Raw script content keyed by the name it was included under.
///
/// The last registration for a name wins.
#[derive(Debug, Default, Clone)]
pub struct RawScriptRegistry {
    scripts: HashMap<String, String>,
}

impl RawScriptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        if self.scripts.insert(name.clone(), content.into()).is_some() {
            tracing::debug!(target: "resolver", "Raw script '{}' re-registered", name);
        }
    }

    /// Registered content for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::RawScriptNotRegistered`] for unknown names;
    /// an unknown name never yields empty content.
    pub fn lookup(&self, name: &str) -> Result<&str, PercolateError> {
        self.scripts.get(name).map(String::as_str).ok_or_else(|| {
            PercolateError::RawScriptNotRegistered {
                name: name.to_string(),
            }
        })
    }

    /// Whether `name` has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Number of registered scripts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
