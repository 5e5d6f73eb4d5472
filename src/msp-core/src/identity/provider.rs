use crate::identity::IdentityManager;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Organization name → identity manager, fixed at construction. Lookups are
/// plain reads and may be made from any number of threads.
#[derive(Clone, Default)]
pub struct IdentityManagerProvider {
    managers: BTreeMap<String, Arc<IdentityManager>>,
}

impl IdentityManagerProvider {
    pub fn new(managers: impl IntoIterator<Item = IdentityManager>) -> Self {
        let managers = managers
            .into_iter()
            .map(|manager| (manager.org_name().to_lowercase(), Arc::new(manager)))
            .collect();
        Self { managers }
    }

    /// `None` means the organization was never configured.
    pub fn identity_manager(&self, org_name: &str) -> Option<Arc<IdentityManager>> {
        self.managers.get(&org_name.to_lowercase()).cloned()
    }

    pub fn organizations(&self) -> impl Iterator<Item = &str> {
        self.managers.keys().map(String::as_str)
    }
}
