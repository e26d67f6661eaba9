use std::path::PathBuf;
use std::time::Duration;

use crate::params::RunParams;

#[derive(Clone)]
pub struct HarvestConfig {
    pub log_level: String,
    pub output_dir: PathBuf,
    pub csv_filename: String,
    /// Run defaults; CLI flags override individual fields.
    pub run: RunParams,
    pub bird_bin: String,
    pub bird_page_size: u32,
    /// Upper bound on a single `bird search` invocation.
    pub bird_timeout: Duration,
    pub twitter_auth_token: Option<String>,
    pub twitter_ct0: Option<String>,
}

impl std::fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("csv_filename", &self.csv_filename)
            .field("run", &self.run)
            .field("bird_bin", &self.bird_bin)
            .field("bird_page_size", &self.bird_page_size)
            .field("bird_timeout", &self.bird_timeout)
            .field(
                "twitter_auth_token",
                &self.twitter_auth_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "twitter_ct0",
                &self.twitter_ct0.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
