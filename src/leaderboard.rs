use crate::models::EngagementStats;
use crate::models::LeaderboardEntry;
use crate::models::PointsCorrection;
use crate::models::WinnerRow;

pub const PUBLIC_TOP_N: i64 = 10;
pub const ADMIN_TOP_N: i64 = 10;
pub const WINNER_COUNT: i64 = 5;

fn rank_emoji(rank: usize) -> String {
  match rank {
    1 => "🥇".to_string(),
    2 => "🥈".to_string(),
    3 => "🥉".to_string(),
    4 | 5 => "🏅".to_string(),
    _ => format!("{rank}."),
  }
}

fn display_or_unknown(name: &str) -> &str {
  let trimmed = name.trim();
  if trimmed.is_empty() { "Unknown" } else { trimmed }
}

/// Public board: display name only, 🏅 for the top five, plain numbering
/// below that. Codes and handles stay out of the group chat.
pub fn render_public_board(entries: &[LeaderboardEntry], show_points: bool) -> String {
  if entries.is_empty() {
    return "📊 No submissions yet".to_string();
  }
  let mut lines = vec!["🏆 PnL Flex Challenge - Top 10".to_string(), String::new()];
  for (idx, entry) in entries.iter().enumerate() {
    let rank = idx + 1;
    let name = display_or_unknown(&entry.display_name);
    let prefix = if rank <= 5 {
      "🏅".to_string()
    } else {
      format!("{rank}.")
    };
    if show_points {
      lines.push(format!("{prefix} {name} - {} pts", entry.points));
    } else {
      lines.push(format!("{prefix} {name}"));
    }
  }
  lines.join("\n")
}

/// Detailed board for admin DMs: medals, codes, user ids, points.
pub fn render_admin_board(entries: &[LeaderboardEntry], scope: &str, show_points: bool) -> String {
  if entries.is_empty() {
    return "📊 No submissions yet".to_string();
  }
  let mut lines = vec![format!("🔐 Admin Dashboard - {scope}"), String::new()];
  for (idx, entry) in entries.iter().enumerate() {
    let name = display_or_unknown(&entry.display_name);
    lines.push(format!(
      "{} {} {} - {} pts",
      rank_emoji(idx + 1),
      entry.code,
      name,
      entry.points
    ));
    let id_line = match entry.tg_user_id {
      Some(id) => format!("   ID: {id}"),
      None => "   ID: (name-keyed)".to_string(),
    };
    lines.push(id_line);
    lines.push(String::new());
  }
  let points_status = if show_points { "ON ✅" } else { "OFF ❌" };
  lines.push(format!("⚙️ Points Display: {points_status}"));
  lines.join("\n")
}

/// Short top-of-board snapshot appended to batch summaries.
pub fn render_top_snapshot(entries: &[LeaderboardEntry]) -> String {
  if entries.is_empty() {
    return "📊 No submissions yet".to_string();
  }
  let mut lines = vec!["🏆 Top 5".to_string()];
  for (idx, entry) in entries.iter().enumerate() {
    lines.push(format!(
      "{} {} - {} pts",
      rank_emoji(idx + 1),
      display_or_unknown(&entry.display_name),
      entry.points
    ));
  }
  lines.join("\n")
}

pub fn render_stats(stats: &EngagementStats) -> String {
  let mut lines = vec![
    "📊 Engagement Stats".to_string(),
    String::new(),
    format!("📅 Current Week: {} ({})", stats.current_week, stats.week_label),
    format!("👥 Active Participants: {}", stats.active_participants),
    format!("📸 Submissions: {}", stats.total_submissions),
    format!("⏭️ Duplicates Caught: {}", stats.duplicates),
    format!("✍️ Manual Adjustments: {}", stats.manual_adjustments),
  ];
  if let Some((name, points)) = &stats.most_active {
    lines.push(format!("🔥 Most Active: {} ({points} pts)", display_or_unknown(name)));
  }
  lines.push(format!("📈 Avg Points: {:.1}", stats.avg_points));
  if let Some(reset_at) = &stats.reset_at {
    lines.push(format!("🕐 Counting Since: {reset_at}"));
  }
  lines.join("\n")
}

pub fn render_winners_selected(week: i32, winners: &[WinnerRow]) -> String {
  let mut lines = vec![format!("✅ Winners Selected for Week {week}"), String::new()];
  for winner in winners {
    lines.push(format!(
      "{} {} - {} pts",
      rank_emoji(winner.rank as usize),
      display_or_unknown(&winner.display_name),
      winner.points_at_time
    ));
  }
  lines.join("\n")
}

pub fn render_saved_winners(week: i32, winners: &[WinnerRow]) -> String {
  if winners.is_empty() {
    return format!("❌ No winners saved for Week {week} yet.\nUse /selectwinners {week} to select them.");
  }
  let mut lines = vec![format!("🏆 Week {week} Winners"), String::new()];
  for winner in winners {
    lines.push(format!(
      "{} {}",
      rank_emoji(winner.rank as usize),
      display_or_unknown(&winner.display_name)
    ));
  }
  lines.join("\n")
}

pub fn render_corrections(corrections: &[PointsCorrection]) -> String {
  if corrections.is_empty() {
    return "✅ All cumulative points are correct, no updates needed.".to_string();
  }
  let mut lines = vec![format!("♻️ Corrected {} participant(s):", corrections.len())];
  for correction in corrections.iter().take(10) {
    lines.push(format!(
      "{} {}: {} → {} pts",
      correction.code,
      display_or_unknown(&correction.display_name),
      correction.old_points,
      correction.new_points
    ));
  }
  if corrections.len() > 10 {
    lines.push(format!("... and {} more", corrections.len() - 10));
  }
  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(code: &str, name: &str, points: i64) -> LeaderboardEntry {
    LeaderboardEntry {
      participant_id: 1,
      code: code.to_string(),
      display_name: name.to_string(),
      tg_user_id: Some(123_456_789),
      username: Some("trader".to_string()),
      points,
    }
  }

  fn ten_entries() -> Vec<LeaderboardEntry> {
    [
      ("John Doe", 45),
      ("Jane Smith", 38),
      ("Crypto Trader", 32),
      ("Moon Boy", 28),
      ("HODL Master", 25),
      ("Ramesh", 22),
      ("Dream Catcher", 19),
      ("Shilpa", 15),
      ("Trader Pro", 12),
      ("Crypto King", 10),
    ]
    .iter()
    .enumerate()
    .map(|(idx, (name, points))| entry(&format!("#{:02}", idx + 1), name, *points))
    .collect()
  }

  #[test]
  fn public_board_medals_top_five_and_numbers_the_rest() {
    let board = render_public_board(&ten_entries(), true);
    let lines: Vec<&str> = board.split('\n').collect();
    assert_eq!(lines[0], "🏆 PnL Flex Challenge - Top 10");
    assert_eq!(lines[1], "");
    assert!(board.contains("🏅 John Doe - 45 pts"));
    assert!(board.contains("🏅 HODL Master - 25 pts"));
    assert!(board.contains("6. Ramesh - 22 pts"));
    assert!(board.contains("10. Crypto King - 10 pts"));
  }

  #[test]
  fn public_board_hides_points_when_disabled() {
    let board = render_public_board(&ten_entries(), false);
    assert!(board.contains("🏅 John Doe"));
    assert!(board.contains("6. Ramesh"));
    assert!(!board.contains(" pts"));
  }

  #[test]
  fn public_board_never_leaks_codes_or_handles() {
    let board = render_public_board(&ten_entries(), true);
    assert!(!board.contains("#01"));
    assert!(!board.contains('@'));
    assert!(!board.contains("123456789"));
  }

  #[test]
  fn public_board_falls_back_to_unknown() {
    let mut short = vec![entry("#01", "", 3)];
    short[0].tg_user_id = None;
    let board = render_public_board(&short, true);
    assert!(board.contains("🏅 Unknown - 3 pts"));
  }

  #[test]
  fn empty_board_has_placeholder() {
    assert_eq!(render_public_board(&[], true), "📊 No submissions yet");
  }

  #[test]
  fn admin_board_shows_codes_and_ids() {
    let board = render_admin_board(&ten_entries()[.. 2], "All Time", true);
    assert!(board.contains("🔐 Admin Dashboard - All Time"));
    assert!(board.contains("🥇 #01 John Doe - 45 pts"));
    assert!(board.contains("   ID: 123456789"));
    assert!(board.contains("⚙️ Points Display: ON ✅"));
  }

  #[test]
  fn top_snapshot_uses_medals() {
    let snapshot = render_top_snapshot(&ten_entries()[.. 3]);
    assert!(snapshot.starts_with("🏆 Top 5"));
    assert!(snapshot.contains("🥇 John Doe - 45 pts"));
    assert!(snapshot.contains("🥉 Crypto Trader - 32 pts"));
  }

  #[test]
  fn stats_include_week_and_counters() {
    let stats = EngagementStats {
      current_week: 2,
      week_label: "Week 2".to_string(),
      active_participants: 7,
      total_submissions: 40,
      duplicates: 3,
      manual_adjustments: 2,
      most_active: Some(("@trader".to_string(), 12)),
      avg_points: 5.71,
      reset_at: Some("2026-01-15".to_string()),
    };
    let text = render_stats(&stats);
    assert!(text.contains("📅 Current Week: 2 (Week 2)"));
    assert!(text.contains("👥 Active Participants: 7"));
    assert!(text.contains("⏭️ Duplicates Caught: 3"));
    assert!(text.contains("🔥 Most Active: @trader (12 pts)"));
    assert!(text.contains("📈 Avg Points: 5.7"));
    assert!(text.contains("🕐 Counting Since: 2026-01-15"));
  }

  #[test]
  fn saved_winners_placeholder_names_the_command() {
    let text = render_saved_winners(2, &[]);
    assert!(text.contains("/selectwinners 2"));
  }

  #[test]
  fn corrections_truncate_after_ten() {
    let corrections: Vec<PointsCorrection> = (0 .. 13)
      .map(|i| PointsCorrection {
        code: format!("#{:02}", i + 1),
        display_name: format!("User {i}"),
        old_points: 5,
        new_points: 4,
      })
      .collect();
    let text = render_corrections(&corrections);
    assert!(text.contains("Corrected 13 participant(s)"));
    assert!(text.contains("... and 3 more"));
    assert!(text.contains("#01 User 0: 5 → 4 pts"));
    assert!(!text.contains("#12"));
  }

  #[test]
  fn no_corrections_message() {
    assert!(render_corrections(&[]).contains("no updates needed"));
  }
}
