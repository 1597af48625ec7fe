use std::collections::HashSet;

use crate::bot::forward::ForwardQueues;
use crate::config::Config;
use crate::db::Db;

pub struct AppContext {
  db: Db,
  config: Config,
  admins: HashSet<i64>,
  forwards: ForwardQueues,
}

impl AppContext {
  pub fn new(db: Db, config: Config) -> Self {
    let admins = config.admins.iter().copied().collect();
    Self {
      db,
      config,
      admins,
      forwards: ForwardQueues::default(),
    }
  }

  pub fn db(&self) -> &Db {
    &self.db
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn forwards(&self) -> &ForwardQueues {
    &self.forwards
  }

  pub fn is_admin(&self, tg_id: i64) -> bool {
    self.admins.contains(&tg_id)
  }
}
