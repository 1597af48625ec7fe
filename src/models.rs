use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct ParticipantRow {
  pub id: i64,
  pub code: String,
  pub identity_key: String,
  pub tg_user_id: Option<i64>,
  pub username: Option<String>,
  pub display_name: String,
  pub points: i64,
  pub first_seen: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub participant_id: i64,
  pub code: String,
  pub display_name: String,
  pub tg_user_id: Option<i64>,
  pub username: Option<String>,
  pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerRow {
  pub rank: i32,
  pub code: String,
  pub display_name: String,
  pub points_at_time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSource {
  Topic,
  Forward,
  #[allow(dead_code)]
  Manual,
}

impl SubmissionSource {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Topic => "topic",
      Self::Forward => "forward",
      Self::Manual => "manual",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  Added,
  Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
  Cumulative {
    display_name: String,
    old_points: i64,
    new_points: i64,
  },
  Weekly {
    display_name: String,
    week: i32,
    delta: i64,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsCorrection {
  pub code: String,
  pub display_name: String,
  pub old_points: i64,
  pub new_points: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeSummary {
  pub submissions: i64,
  pub adjustments: i64,
}

#[derive(Debug, Clone)]
pub struct RemovedParticipant {
  pub code: String,
  pub display_name: String,
  pub points: i64,
}

#[derive(Debug, Clone)]
pub struct WeekChange {
  pub old_week: i32,
  pub old_label: String,
  pub new_week: i32,
  pub new_label: String,
}

#[derive(Debug, Clone)]
pub struct EngagementStats {
  pub current_week: i32,
  pub week_label: String,
  pub active_participants: i64,
  pub total_submissions: i64,
  pub duplicates: i64,
  pub manual_adjustments: i64,
  pub most_active: Option<(String, i64)>,
  pub avg_points: f64,
  pub reset_at: Option<String>,
}
