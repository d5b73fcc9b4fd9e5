/// Render the public home page's pastor message block.
///
/// Usage: pastor-home
///   Reads API_URL from the environment (or .env). Always exits 0: an
///   unreachable backend renders the same placeholder as "no active message".

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pastor_messages::config::Config;
use pastor_messages::services::pastor_messages::PastorMessageApi;
use pastor_messages::views::home::HomeView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let api = PastorMessageApi::new(&config.api_url);

    let view = HomeView::mount(&api).await;
    print!("{}", view.render());

    Ok(())
}
