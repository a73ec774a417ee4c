//! The filesystem access rule granted on the site content directory.

/// Built-in low-privilege identity IIS worker processes run under.
pub const WORKER_IDENTITY: &str = "IIS_IUSRS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRights {
    FullControl,
    Modify,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessEffect {
    Allow,
    Deny,
}

/// A directory access-control entry.
///
/// The default is the rule the deployment needs: full control for the
/// worker identity, inherited by subdirectories and files, allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub identity: String,
    pub rights: AccessRights,
    /// Inherited by subdirectories.
    pub container_inherit: bool,
    /// Inherited by files.
    pub object_inherit: bool,
    pub effect: AccessEffect,
}

impl Default for AccessRule {
    fn default() -> Self {
        Self {
            identity: WORKER_IDENTITY.to_string(),
            rights: AccessRights::FullControl,
            container_inherit: true,
            object_inherit: true,
            effect: AccessEffect::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_grants_worker_full_control() {
        let rule = AccessRule::default();
        assert_eq!(rule.identity, "IIS_IUSRS");
        assert_eq!(rule.rights, AccessRights::FullControl);
        assert!(rule.container_inherit);
        assert!(rule.object_inherit);
        assert_eq!(rule.effect, AccessEffect::Allow);
    }
}
