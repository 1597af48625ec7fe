use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?\d{1,6}$").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
  #[error("participant code must look like #01")]
  InvalidCode,
  #[error("week must be a number of 1 or greater")]
  InvalidWeek,
  #[error("delta must be a non-zero integer like 3 or -2")]
  InvalidDelta,
  #[error("missing argument: {0}")]
  Missing(&'static str),
}

/// Normalizes a display name for identity-key purposes: lowercased,
/// trimmed, inner whitespace runs collapsed to single spaces.
pub fn normalize_name(name: &str) -> String {
  name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Derives the stable identity key for a submitter. A known Telegram user
/// id always wins; otherwise the normalized display name is used. Returns
/// `None` when neither is usable - such a photo cannot be credited.
pub fn identity_key(tg_user_id: Option<i64>, full_name: &str) -> Option<String> {
  if let Some(id) = tg_user_id {
    return Some(format!("tg:{id}"));
  }
  let normalized = normalize_name(full_name);
  if normalized.is_empty() {
    return None;
  }
  Some(format!("name:{normalized}"))
}

/// Display name shown on boards: the @handle when one exists, else the
/// full name as forwarded.
pub fn display_name(username: Option<&str>, full_name: &str) -> String {
  match username {
    Some(handle) if !handle.is_empty() => format!("@{handle}"),
    _ => full_name.to_string(),
  }
}

/// Accepts participant codes with or without the # prefix ("7", "#07",
/// "33") and returns the canonical `#NN` form used in storage.
pub fn normalize_code(raw: &str) -> Result<String, ArgError> {
  let raw = raw.trim();
  if !CODE_PATTERN.is_match(raw) {
    return Err(ArgError::InvalidCode);
  }
  let digits = raw.trim_start_matches('#');
  let number: u32 = digits.parse().map_err(|_| ArgError::InvalidCode)?;
  Ok(format!("#{number:02}"))
}

pub fn parse_week(raw: &str) -> Result<i32, ArgError> {
  match raw.trim().parse::<i32>() {
    Ok(week) if week >= 1 => Ok(week),
    _ => Err(ArgError::InvalidWeek),
  }
}

/// Cumulative totals never go below zero; an over-sized negative
/// adjustment lands exactly on zero.
pub fn apply_cumulative_delta(points: i64, delta: i64) -> i64 {
  (points + delta).max(0)
}

pub fn parse_delta(raw: &str) -> Result<i64, ArgError> {
  match raw.trim().parse::<i64>() {
    Ok(0) | Err(_) => Err(ArgError::InvalidDelta),
    Ok(delta) => Ok(delta),
  }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AdjustArgs {
  pub code: String,
  pub delta: i64,
  pub note: Option<String>,
}

/// `<code> <delta> [note...]`
pub fn parse_adjust_args(raw: &str) -> Result<AdjustArgs, ArgError> {
  let mut parts = raw.split_whitespace();
  let code = normalize_code(parts.next().ok_or(ArgError::Missing("participant code"))?)?;
  let delta = parse_delta(parts.next().ok_or(ArgError::Missing("delta"))?)?;
  let note = rest_as_note(parts);
  Ok(AdjustArgs { code, delta, note })
}

#[derive(Debug, PartialEq, Eq)]
pub struct WeekAdjustArgs {
  pub code: String,
  pub week: i32,
  pub delta: i64,
  pub note: Option<String>,
}

/// `<code> <week> <delta> [note...]`
pub fn parse_week_adjust_args(raw: &str) -> Result<WeekAdjustArgs, ArgError> {
  let mut parts = raw.split_whitespace();
  let code = normalize_code(parts.next().ok_or(ArgError::Missing("participant code"))?)?;
  let week = parse_week(parts.next().ok_or(ArgError::Missing("week"))?)?;
  let delta = parse_delta(parts.next().ok_or(ArgError::Missing("delta"))?)?;
  let note = rest_as_note(parts);
  Ok(WeekAdjustArgs {
    code,
    week,
    delta,
    note,
  })
}

/// `<week> [label...]`
pub fn parse_week_and_label(raw: &str) -> Result<(i32, Option<String>), ArgError> {
  let trimmed = raw.trim();
  let (week_part, label_part) = match trimmed.split_once(char::is_whitespace) {
    Some((week, label)) => (week, Some(label.trim())),
    None => (trimmed, None),
  };
  if week_part.is_empty() {
    return Err(ArgError::Missing("week"));
  }
  let week = parse_week(week_part)?;
  Ok((week, label_part.filter(|l| !l.is_empty()).map(str::to_string)))
}

pub fn parse_required_week(raw: &str) -> Result<i32, ArgError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(ArgError::Missing("week"));
  }
  parse_week(trimmed)
}

pub fn parse_optional_label(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn rest_as_note<'a>(parts: impl Iterator<Item = &'a str>) -> Option<String> {
  let note = parts.collect::<Vec<_>>().join(" ");
  if note.is_empty() { None } else { Some(note) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_names() {
    assert_eq!(normalize_name("  Moon   Boy "), "moon boy");
    assert_eq!(normalize_name("HODL Master"), "hodl master");
    assert_eq!(normalize_name("   "), "");
  }

  #[test]
  fn identity_key_prefers_user_id() {
    assert_eq!(identity_key(Some(111), "Moon Boy"), Some("tg:111".to_string()));
    assert_eq!(identity_key(None, "Moon Boy"), Some("name:moon boy".to_string()));
    assert_eq!(identity_key(None, "  "), None);
  }

  #[test]
  fn display_name_prefers_handle() {
    assert_eq!(display_name(Some("trader"), "John Doe"), "@trader");
    assert_eq!(display_name(None, "John Doe"), "John Doe");
    assert_eq!(display_name(Some(""), "John Doe"), "John Doe");
  }

  #[test]
  fn normalizes_codes() {
    assert_eq!(normalize_code("7"), Ok("#07".to_string()));
    assert_eq!(normalize_code("#07"), Ok("#07".to_string()));
    assert_eq!(normalize_code("33"), Ok("#33".to_string()));
    assert_eq!(normalize_code("#120"), Ok("#120".to_string()));
    assert_eq!(normalize_code("abc"), Err(ArgError::InvalidCode));
    assert_eq!(normalize_code("#"), Err(ArgError::InvalidCode));
  }

  #[test]
  fn cumulative_delta_clamps_at_zero() {
    assert_eq!(apply_cumulative_delta(5, -100), 0);
    assert_eq!(apply_cumulative_delta(5, -5), 0);
    assert_eq!(apply_cumulative_delta(5, 3), 8);
    assert_eq!(apply_cumulative_delta(0, -1), 0);
  }

  #[test]
  fn parses_adjust_args() {
    assert_eq!(
      parse_adjust_args("#02 -5 fat finger"),
      Ok(AdjustArgs {
        code: "#02".to_string(),
        delta: -5,
        note: Some("fat finger".to_string()),
      })
    );
    assert_eq!(
      parse_adjust_args("3 10"),
      Ok(AdjustArgs {
        code: "#03".to_string(),
        delta: 10,
        note: None,
      })
    );
    assert_eq!(parse_adjust_args("#02 0"), Err(ArgError::InvalidDelta));
    assert_eq!(parse_adjust_args("#02"), Err(ArgError::Missing("delta")));
    assert_eq!(parse_adjust_args(""), Err(ArgError::Missing("participant code")));
  }

  #[test]
  fn parses_week_adjust_args() {
    assert_eq!(
      parse_week_adjust_args("#05 2 5 bonus"),
      Ok(WeekAdjustArgs {
        code: "#05".to_string(),
        week: 2,
        delta: 5,
        note: Some("bonus".to_string()),
      })
    );
    assert_eq!(parse_week_adjust_args("#05 0 5"), Err(ArgError::InvalidWeek));
  }

  #[test]
  fn parses_week_and_label() {
    assert_eq!(parse_week_and_label("3"), Ok((3, None)));
    assert_eq!(
      parse_week_and_label("3 Finals Week"),
      Ok((3, Some("Finals Week".to_string())))
    );
    assert_eq!(parse_week_and_label(""), Err(ArgError::Missing("week")));
    assert_eq!(parse_week_and_label("0"), Err(ArgError::InvalidWeek));
  }

  #[test]
  fn parses_required_week() {
    assert_eq!(parse_required_week(" 4 "), Ok(4));
    assert_eq!(parse_required_week(""), Err(ArgError::Missing("week")));
    assert_eq!(parse_required_week("x"), Err(ArgError::InvalidWeek));
  }
}
