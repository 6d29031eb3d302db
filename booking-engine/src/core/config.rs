/// Engine configuration, resolved once at startup.
///
/// # Environment variables
///
/// | Variable         | Default | Meaning                                   |
/// |------------------|---------|-------------------------------------------|
/// | `MAX_PARTY_SIZE` | `20`    | Largest party size a reservation may hold |
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for a reservation's party size. The allocator formula
    /// itself has no ceiling; this caps what the engine accepts.
    pub max_party_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_party_size: std::env::var("MAX_PARTY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n >= 1)
                .unwrap_or(20),
        }
    }

    /// Same as [`Config::from_env`] but with an explicit party cap.
    pub fn with_max_party_size(max_party_size: u32) -> Self {
        let mut config = Self::from_env();
        config.max_party_size = max_party_size;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
