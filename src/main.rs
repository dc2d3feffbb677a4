use anyhow::{Context, Result};
use std::path::PathBuf;

use zenflow_lib::settings::AppSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    zenflow_lib::init_tracing();

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => AppSettings::load(&path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => AppSettings::default(),
    };

    zenflow_lib::run(settings).await
}
