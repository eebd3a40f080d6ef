use std::error::Error;

use catalog::commands::{Command, run_command};
use catalog::executable_utils::{initialize_executable, initialize_tracing};
use catalog::storage::{ProdProductStorage, ProductStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let (args, config) = initialize_executable()?;
    initialize_tracing(&config.catalog.log_level);
    tracing::info!("Starting {}", config.common.project_name);

    let storage = ProdProductStorage::new(&config.common.database_url).await?;
    if args.command != Command::InitDb {
        storage.init_db().await?;
    }

    let output = run_command(&storage, args.command).await?;
    println!("{}", output);
    Ok(())
}
