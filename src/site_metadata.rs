/// Site wide settings the publisher reads but never changes.
pub trait SiteMetadata: Send + Sync {
    fn active_theme(&self) -> String;
}

/// Theme taken from the `[site]` section of the configuration.
pub struct ConfiguredSiteMetadata {
    theme: String,
}

impl ConfiguredSiteMetadata {
    pub fn new(theme: &str) -> Self {
        Self { theme: theme.to_string() }
    }
}

impl SiteMetadata for ConfiguredSiteMetadata {
    fn active_theme(&self) -> String {
        self.theme.clone()
    }
}
