pub struct DefaultsConfig {
    pub scattering_marker: String,
    pub title_placeholder: String,
    pub fetch_scattering: bool,
    pub allow_partial_geometry: bool,
    pub sasbdb_base_url: String,
    pub sasbdb_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            scattering_marker: "SAS".to_string(),
            title_placeholder: "Title not available".to_string(),
            fetch_scattering: true,
            allow_partial_geometry: false,
            sasbdb_base_url: "https://www.sasbdb.org/rest-api/entry/summary".to_string(),
            sasbdb_timeout_secs: 30,
        }
    }
}
