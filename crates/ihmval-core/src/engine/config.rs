use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Substring of a dataset type marking scattering data.
    pub scattering_marker: String,
    /// Used for `Title` when the entry has no citation.
    pub title_placeholder: String,
    /// When false, scattering datasets are ignored and nothing is fetched.
    pub fetch_scattering: bool,
    /// When true, an incomplete geometry result drops the geometry section
    /// instead of failing the report.
    pub allow_partial_geometry: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            scattering_marker: "SAS".to_string(),
            title_placeholder: "Title not available".to_string(),
            fetch_scattering: true,
            allow_partial_geometry: false,
        }
    }
}

#[derive(Default)]
pub struct ReportConfigBuilder {
    scattering_marker: Option<String>,
    title_placeholder: Option<String>,
    fetch_scattering: Option<bool>,
    allow_partial_geometry: Option<bool>,
}

impl ReportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scattering_marker(mut self, marker: impl Into<String>) -> Self {
        self.scattering_marker = Some(marker.into());
        self
    }
    pub fn title_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.title_placeholder = Some(placeholder.into());
        self
    }
    pub fn fetch_scattering(mut self, enabled: bool) -> Self {
        self.fetch_scattering = Some(enabled);
        self
    }
    pub fn allow_partial_geometry(mut self, allowed: bool) -> Self {
        self.allow_partial_geometry = Some(allowed);
        self
    }

    pub fn build(self) -> Result<ReportConfig, ConfigError> {
        let scattering_marker = self
            .scattering_marker
            .ok_or(ConfigError::MissingParameter("scattering_marker"))?;
        if scattering_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "scattering_marker",
                reason: "an empty marker would match every dataset".to_string(),
            });
        }
        Ok(ReportConfig {
            scattering_marker,
            title_placeholder: self
                .title_placeholder
                .ok_or(ConfigError::MissingParameter("title_placeholder"))?,
            fetch_scattering: self
                .fetch_scattering
                .ok_or(ConfigError::MissingParameter("fetch_scattering"))?,
            allow_partial_geometry: self
                .allow_partial_geometry
                .ok_or(ConfigError::MissingParameter("allow_partial_geometry"))?,
        })
    }
}
