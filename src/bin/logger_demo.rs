use loginwarden::logger::*;
use loginwarden::settings::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!(filter = %logger.current_filter()?, "bootstrap info log");

    // Reload from the log section of the default settings file
    let project_settings = parse_settings(None)?;
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;
    trace!("application trace log");
    debug!("application debug log");
    info!(filter = %logger.current_filter()?, "application info log");

    // An invalid directive is rejected and the previous filter stays in place
    let bad = LogConfig {
        filter: "loginwarden=[".to_string(),
    };
    println!("Invalid filter rejected: {:?}", logger.reload_from_config(&bad).is_err());

    Ok(())
}
