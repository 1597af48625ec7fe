use serde::Deserialize;
use serde::Serialize;

/// Dialogue state. Only destructive admin operations hold state: they
/// wait for an explicit `confirm` reply before touching anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum ConversationState {
  #[default]
  Idle,
  ConfirmReset {
    admin_tg_id: i64,
  },
  ConfirmPurge {
    admin_tg_id: i64,
    week: i32,
  },
}

#[cfg(test)]
mod tests {
  use super::ConversationState;

  #[test]
  fn default_state_is_idle() {
    assert_eq!(ConversationState::default(), ConversationState::Idle);
  }
}
