use anyhow::Result;

use robot_commands::cli;
use robot_commands::config::Config;

fn main() -> Result<()> {
    // Parse configuration from command line and config file
    let config = Config::from_args_and_env()?;

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = &config.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    if let Some(path) = &config.config_file {
        log::debug!("loaded config from {}", path.display());
    }

    cli::run(&config)
}
