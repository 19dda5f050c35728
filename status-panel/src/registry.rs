use crate::error::RegistryError;
use crate::panel::StatusPanel;
use std::collections::BTreeMap;

/// Panels owned by the hosting dashboard.
///
/// Registration happens explicitly during application startup, so
/// initialisation order is visible and duplicate registration is a
/// reportable error rather than a load-time side effect.
#[derive(Default)]
pub struct PanelRegistry {
    panels: BTreeMap<String, StatusPanel>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        panel: StatusPanel,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.panels.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.panels.insert(name, panel);
        Ok(())
    }

    /// Remove a panel, detaching it on the way out.
    pub fn remove(&mut self, name: &str) -> Option<StatusPanel> {
        let mut panel = self.panels.remove(name)?;
        panel.detach();
        Some(panel)
    }

    pub fn get(&self, name: &str) -> Option<&StatusPanel> {
        self.panels.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StatusPanel> {
        self.panels.get_mut(name)
    }

    pub fn attach_all(&mut self) {
        for panel in self.panels.values_mut() {
            panel.attach();
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
