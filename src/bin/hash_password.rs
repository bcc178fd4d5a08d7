//! Prints an Argon2id PHC string for a password, for `password_hash` seeds
//! or rows of the `auth_credential` table.
//!
//! $ cargo run --bin hash_password -- DUMMY_PASSWORD

use clap::Parser;
use loginwarden::application_impl::Argon2PasswordHasher;
use loginwarden::application_port::CredentialHasher;

#[derive(Parser, Debug)]
struct Args {
    password: String,
    #[arg(long)]
    memory_kib: Option<u32>,
    #[arg(long)]
    iterations: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let hasher = match (args.memory_kib, args.iterations) {
        (None, None) => Argon2PasswordHasher::new(),
        (m, t) => Argon2PasswordHasher::with_cost(
            m.unwrap_or(argon2::Params::DEFAULT_M_COST),
            t.unwrap_or(argon2::Params::DEFAULT_T_COST),
        )?,
    };
    println!("{}", hasher.hash_password(&args.password).await?);
    Ok(())
}
