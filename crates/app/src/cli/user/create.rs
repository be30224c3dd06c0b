use bella_app::{
    auth::{Registration, password::hash_password, validate_registration},
    database::{self, Db},
    domain::users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
};
use clap::Args;
use zeroize::Zeroizing;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Email address; stored trimmed and lowercased
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Initial password
    #[arg(long, env = "BELLA_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = 12)]
    bcrypt_cost: u32,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let registration = Registration {
        email: args.email,
        name: args.name,
        password: Zeroizing::new(args.password),
    };

    let (email, name) = validate_registration(&registration).map_err(|error| error.to_string())?;

    let password_hash = hash_password(registration.password, args.bcrypt_cost)
        .await
        .map_err(|error| format!("failed to hash password: {error}"))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email,
            name,
            password_hash,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);

    Ok(())
}
