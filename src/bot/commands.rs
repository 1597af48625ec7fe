use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
  /// Greet and explain how submissions work
  Start,
  /// Show the help text
  Help,
  /// Show the top 10 leaderboard
  Rank,
  /// Admin: detailed board, optionally for one week
  Board(String),
  /// Admin: engagement statistics
  Stats,
  /// Admin: /adjust <code> <delta> [note]
  Adjust(String),
  /// Admin: /weekadjust <code> <week> <delta> [note]
  WeekAdjust(String),
  /// Admin: /setweek <week> [label]
  SetWeek(String),
  /// Admin: advance to the next week, optional label
  NewWeek(String),
  /// Admin: /removeuser <code>
  RemoveUser(String),
  /// Admin: reconcile cumulative totals with submissions
  Recalc,
  /// Admin: /removedata <week> - purge a week into backup
  RemoveData(String),
  /// Admin: /undodata <week> - restore a purged week
  UndoData(String),
  /// Admin: /selectwinners <week> - save the week's top 5
  SelectWinners(String),
  /// Admin: /winners <week> - show saved winners
  Winners(String),
  /// Admin: show points on the public board
  PointsOn,
  /// Admin: hide points on the public board
  PointsOff,
  /// Admin: wipe all data (asks for confirmation)
  ResetAll,
}
