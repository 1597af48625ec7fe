mod app;
mod bot;
mod config;
mod db;
mod fraud;
mod leaderboard;
mod models;
mod telemetry;
mod util;

use anyhow::Result;
use teloxide::prelude::Bot;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
  telemetry::init()?;
  let config = config::Config::from_env()?;
  info!(
    admin_count = config.admins.len(),
    chat_id = config.chat_id,
    topic_id = config.topic_id,
    fraud_screening = config.fraud_screening,
    "starting leaderboard bot"
  );

  let bot = Bot::new(config.bot_token.clone());
  let db = db::Db::connect(&config.database_url).await?;
  let app = app::App::new(bot, db, config);
  app.run().await
}
