use clap::Subcommand;
use commitstreak_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the merged configuration with secrets masked
    Show,
    /// Validate the merged configuration
    Check,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::resolve()?;
            let json = serde_json::to_string_pretty(&config.redacted())?;
            println!("{json}");
        }
        ConfigAction::Check => {
            let config = Config::resolve()?;
            config.validate()?;
            println!("ok");
        }
    }
    Ok(())
}
