use clap::Parser;
use inetnum_ip_count::{run, Settings};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let settings = Settings::parse();
    log4rs::init_file(&settings.log_config, Default::default())
        .map_err(|e| format!("Error initializing log4rs: {e}"))?;
    //
    log::info!("#Start main() {settings:?}");

    let stats = run(&settings)?;
    log::info!("#End main() {} of {} addresses matched", stats.matched, stats.total);

    Ok(())
}
