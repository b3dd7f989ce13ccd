use std::env;
use std::error::Error;
use std::fs;
use std::process::ExitCode;

use fetuccine_hub::logging::FileSink;
use fetuccine_hub::{CliDriver, HubBuilder, HubConfig, Logger};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fetuccine-hub: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match env::args_os().nth(1) {
        Some(path) => HubConfig::from_path(path)?,
        None => HubConfig::default(),
    };

    let logger = match &config.log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Some(Logger::new(FileSink::new(path, config.log_max_bytes)?))
        }
        None => None,
    };

    let mut builder = HubBuilder::new(config);
    if let Some(logger) = logger {
        builder = builder.with_logger(logger);
    }

    CliDriver::new(builder.build()?).run()?;
    Ok(())
}
