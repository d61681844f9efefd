use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dashboard feature toggles. Unknown flags read as disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn enable(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), true);
    }

    pub fn disable(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), false);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_is_disabled() {
        let flags = FeatureFlags::default();
        assert!(!flags.is_enabled("trending-feed"));
    }

    #[test]
    fn toggles_and_serializes_as_map() {
        let mut flags = FeatureFlags::default();
        flags.enable("trending-feed");
        flags.disable("analytics");
        assert!(flags.is_enabled("trending-feed"));
        assert_eq!(
            serde_json::to_value(&flags).unwrap(),
            serde_json::json!({ "analytics": false, "trending-feed": true })
        );
    }
}
