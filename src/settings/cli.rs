use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Credential validation and session service")]
pub struct Cli {
    /// Path to a settings file; defaults to settings/dev.toml in debug builds.
    #[arg(long)]
    pub settings: Option<String>,
}
