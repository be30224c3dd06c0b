use bella_app::{
    auth::{AuthService, AuthSettings, PgAuthService, SessionUuid},
    database::{self, Db},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Session UUID to revoke
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: RevokeSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(Db::new(pool), AuthSettings::default());

    let revoked = service
        .revoke_session(SessionUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to revoke session: {error}"))?;

    if revoked {
        println!("revoked session {}", args.uuid);
    } else {
        println!("session {} was not active", args.uuid);
    }

    Ok(())
}
