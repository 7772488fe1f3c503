//! Per-variant instance counting for display names.

use std::collections::HashMap;

use super::types::ComponentKind;

#[derive(Debug, Clone, Copy, Default)]
struct KindCount {
    live: usize,
    last_id: u32,
}

/// Counts live components per variant and hands out display IDs.
///
/// IDs increase monotonically per variant and are never reused, even after
/// the component they named is removed. Carries no electrical meaning.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    counts: HashMap<ComponentKind, KindCount>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new instance of `kind` and return its ID (starting at 1).
    pub fn register(&mut self, kind: ComponentKind) -> u32 {
        let entry = self.counts.entry(kind).or_default();
        entry.live += 1;
        entry.last_id += 1;
        entry.last_id
    }

    /// Record the destruction of an instance of `kind`.
    pub fn release(&mut self, kind: ComponentKind) {
        if let Some(entry) = self.counts.get_mut(&kind) {
            entry.live = entry.live.saturating_sub(1);
        }
    }

    /// Number of live instances of `kind`.
    pub fn count(&self, kind: ComponentKind) -> usize {
        self.counts.get(&kind).map_or(0, |c| c.live)
    }

    /// Display name for instance `id` of `kind`, e.g. "Resistor 3".
    pub fn display_name(kind: ComponentKind, id: u32) -> String {
        format!("{} {}", kind.display_name(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_per_kind_and_monotonic() {
        let mut registry = InstanceRegistry::new();
        assert_eq!(registry.register(ComponentKind::Resistor), 1);
        assert_eq!(registry.register(ComponentKind::Resistor), 2);
        assert_eq!(registry.register(ComponentKind::Wire), 1);

        registry.release(ComponentKind::Resistor);
        assert_eq!(registry.count(ComponentKind::Resistor), 1);
        assert_eq!(registry.register(ComponentKind::Resistor), 3);
        assert_eq!(registry.count(ComponentKind::Resistor), 2);
    }

    #[test]
    fn test_release_never_underflows() {
        let mut registry = InstanceRegistry::new();
        registry.release(ComponentKind::Clock);
        assert_eq!(registry.count(ComponentKind::Clock), 0);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            InstanceRegistry::display_name(ComponentKind::DcVoltage, 2),
            "DCVoltage 2"
        );
    }
}
