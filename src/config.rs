use std::env;

use anyhow::Context;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
  pub bot_token: String,
  pub database_url: String,
  pub admins: Vec<i64>,
  /// Group chat whose forum topic is tracked for submissions.
  pub chat_id: i64,
  /// Thread id of the tracked topic inside `chat_id`.
  pub topic_id: i32,
  /// Advisory perceptual-hash screening of accepted photos. Off by
  /// default; never blocks a submission.
  pub fraud_screening: bool,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let bot_token = env::var("BOT_TOKEN")
      .or_else(|_| env::var("TELOXIDE_TOKEN"))
      .context("BOT_TOKEN or TELOXIDE_TOKEN must be set")?;
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let chat_id = env::var("CHAT_ID")
      .context("CHAT_ID must be set")?
      .trim()
      .parse::<i64>()
      .context("CHAT_ID must be a numeric chat id")?;
    let topic_id = env::var("TOPIC_ID")
      .context("TOPIC_ID must be set")?
      .trim()
      .parse::<i32>()
      .context("TOPIC_ID must be a numeric thread id")?;
    let admins_raw = env::var("ADMIN_IDS").unwrap_or_default();
    let admins = parse_admins(&admins_raw);
    let fraud_screening = env::var("FRAUD_SCREENING")
      .map(|value| parse_flag(&value))
      .unwrap_or(false);
    Ok(Self {
      bot_token,
      database_url,
      admins,
      chat_id,
      topic_id,
      fraud_screening,
    })
  }
}

fn parse_admins(raw: &str) -> Vec<i64> {
  raw
    .split(',')
    .filter_map(|id| {
      let trimmed = id.trim();
      if trimmed.is_empty() {
        return None;
      }
      match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => {
          tracing::warn!(value = trimmed, error = %err, "invalid ADMIN_IDS entry");
          None
        },
      }
    })
    .collect()
}

fn parse_flag(raw: &str) -> bool {
  matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
  use super::parse_admins;
  use super::parse_flag;

  #[test]
  fn parses_valid_admins() {
    let admins = parse_admins("1, 2 ,3");
    assert_eq!(admins, vec![1, 2, 3]);
  }

  #[test]
  fn skips_invalid_entries() {
    let admins = parse_admins("42,abc,  7");
    assert_eq!(admins, vec![42, 7]);
  }

  #[test]
  fn empty_input_yields_empty_list() {
    let admins = parse_admins("");
    assert!(admins.is_empty());
  }

  #[test]
  fn parses_flags() {
    assert!(parse_flag("true"));
    assert!(parse_flag(" 1 "));
    assert!(parse_flag("ON"));
    assert!(!parse_flag("false"));
    assert!(!parse_flag(""));
  }
}
