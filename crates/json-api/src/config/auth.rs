//! Auth Config

use bella_app::auth::{AuthSettings, DEFAULT_BCRYPT_COST, DEFAULT_SESSION_TTL_SECONDS};
use clap::Args;

/// Session and password hashing settings.
#[derive(Debug, Clone, Args)]
pub struct AuthConfig {
    /// Session lifetime in seconds
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value_t = DEFAULT_SESSION_TTL_SECONDS)]
    pub session_ttl_seconds: u64,

    /// bcrypt work factor for new password hashes (4-31)
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = DEFAULT_BCRYPT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn settings(&self) -> AuthSettings {
        AuthSettings {
            session_ttl_seconds: self.session_ttl_seconds,
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        auth: AuthConfig,
    }

    #[test]
    fn defaults_to_seven_day_sessions_and_cost_twelve() {
        let harness = Harness::parse_from(["bella-json"]);

        assert_eq!(harness.auth.settings(), AuthSettings::default());
    }

    #[test]
    fn rejects_bcrypt_cost_out_of_range() {
        assert!(Harness::try_parse_from(["bella-json", "--bcrypt-cost", "3"]).is_err());
    }
}
