//! Arena configuration parameters.

/// Configuration for a root arena construction.
///
/// Copied into the shared arena state at construction; every handle cloned
/// or rebound from the root sees the same values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Label shown in diagnostic dumps and log events.
    ///
    /// Default: `None` (rendered as `<unnamed>`).
    pub name: Option<String>,

    /// Record outstanding allocations and reject frees that do not match one.
    ///
    /// Default: `false`. When disabled, a free releases whatever range the
    /// caller describes, so double frees and mismatched sizes go undetected.
    pub track_allocations: bool,
}

impl ArenaConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostic name. An empty string clears it.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Enable or disable allocation tracking.
    pub fn with_tracking(mut self, enabled: bool) -> Self {
        self.track_allocations = enabled;
        self
    }
}
