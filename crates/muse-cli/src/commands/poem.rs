use muse_brainstorm::poem_agent;
use muse_core::Config;
use tracing::info;

use super::create_provider;

pub async fn run(config: &Config, prompt: &str) -> anyhow::Result<()> {
    let agent = poem_agent::<()>(create_provider(config)?, config)?;
    info!(agent = agent.name(), model = %agent.config().model, "Running one-shot prompt");

    let poem = agent.chat(&mut (), prompt).await?;
    println!("{}", poem);

    Ok(())
}
