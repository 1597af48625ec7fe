use anyhow::Context;
use anyhow::Result;
use sqlx::Pool;
use sqlx::Postgres;
use sqlx::Row;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::models::AdjustOutcome;
use crate::models::EngagementStats;
use crate::models::LeaderboardEntry;
use crate::models::PointsCorrection;
use crate::models::PurgeSummary;
use crate::models::RemovedParticipant;
use crate::models::SubmissionSource;
use crate::models::SubmitOutcome;
use crate::models::WeekChange;
use crate::models::WinnerRow;
use crate::util;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// The "already exists" signal from the storage layer is the authoritative
/// duplicate check for both participant identities and submissions; the
/// preceding SELECTs are only fast paths.
fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[derive(Clone)]
pub struct Db {
  pool: Pool<Postgres>,
}

impl Db {
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    MIGRATOR.run(&pool).await?;
    Ok(Self { pool })
  }

  // -------------------------------------------------------------------
  // Settings
  // -------------------------------------------------------------------

  #[instrument(skip(self))]
  pub async fn setting(&self, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  #[instrument(skip(self))]
  pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
    sqlx::query(
      r#"
      INSERT INTO settings (key, value)
      VALUES ($1, $2)
      ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
      "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn show_points(&self) -> Result<bool> {
    let value = self.setting("show_points").await?;
    Ok(value.as_deref().map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(true))
  }

  #[instrument(skip(self))]
  pub async fn set_show_points(&self, show: bool) -> Result<()> {
    self.set_setting("show_points", if show { "true" } else { "false" }).await
  }

  #[instrument(skip(self))]
  pub async fn current_week(&self) -> Result<i32> {
    let value = self.setting("current_week").await?;
    Ok(value.and_then(|v| v.parse().ok()).unwrap_or(1))
  }

  #[instrument(skip(self))]
  pub async fn week_label(&self) -> Result<String> {
    let value = self.setting("week_label").await?;
    Ok(value.unwrap_or_else(|| "Week 1".to_string()))
  }

  #[instrument(skip(self))]
  pub async fn set_current_week(&self, week: i32, label: Option<&str>) -> Result<(i32, String)> {
    let label = label.map(str::to_string).unwrap_or_else(|| format!("Week {week}"));
    let mut tx = self.pool.begin().await?;
    sqlx::query("UPDATE settings SET value = $1 WHERE key = 'current_week'")
      .bind(week.to_string())
      .execute(&mut *tx)
      .await?;
    sqlx::query("UPDATE settings SET value = $1 WHERE key = 'week_label'")
      .bind(&label)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;
    info!(week, label = %label, "current week set");
    Ok((week, label))
  }

  /// Advances the week counter without touching any recorded data.
  #[instrument(skip(self))]
  pub async fn start_new_week(&self, label: Option<&str>) -> Result<WeekChange> {
    let mut tx = self.pool.begin().await?;
    let old_week: i32 = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = 'current_week' FOR UPDATE")
      .fetch_optional(&mut *tx)
      .await?
      .and_then(|v| v.parse().ok())
      .unwrap_or(1);
    let old_label = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = 'week_label'")
      .fetch_optional(&mut *tx)
      .await?
      .unwrap_or_else(|| format!("Week {old_week}"));

    let new_week = old_week + 1;
    let new_label = label.map(str::to_string).unwrap_or_else(|| format!("Week {new_week}"));

    sqlx::query("UPDATE settings SET value = $1 WHERE key = 'current_week'")
      .bind(new_week.to_string())
      .execute(&mut *tx)
      .await?;
    sqlx::query("UPDATE settings SET value = $1 WHERE key = 'week_label'")
      .bind(&new_label)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    info!(old_week, new_week, new_label = %new_label, "started new week");
    Ok(WeekChange {
      old_week,
      old_label,
      new_week,
      new_label,
    })
  }

  // -------------------------------------------------------------------
  // Participants
  // -------------------------------------------------------------------

  /// Maps a (tg user id, handle, full name) triple to a participant id,
  /// creating the participant with the next sequential code on first
  /// sight. The whole read-allocate-insert runs in one transaction; a
  /// racing creation of the same identity is resolved by re-reading.
  #[instrument(skip(self))]
  pub async fn resolve_participant(
    &self,
    tg_user_id: Option<i64>,
    username: Option<&str>,
    full_name: &str,
  ) -> Result<i64> {
    let identity_key =
      util::identity_key(tg_user_id, full_name).context("cannot derive identity key: no user id and no usable name")?;
    let display_name = util::display_name(username, full_name);

    let mut tx = self.pool.begin().await?;
    let existing = sqlx::query("SELECT id FROM participants WHERE identity_key = $1")
      .bind(&identity_key)
      .fetch_optional(&mut *tx)
      .await?;

    if let Some(row) = existing {
      let id: i64 = row.get("id");
      sqlx::query("UPDATE participants SET username = $1, display_name = $2, updated_at = now() WHERE id = $3")
        .bind(username)
        .bind(&display_name)
        .bind(id)
        .execute(&mut *tx)
        .await?;
      tx.commit().await?;
      return Ok(id);
    }

    // Lock the counter row so concurrent creations cannot hand out the
    // same code.
    let next: i64 =
      sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = 'next_code_number' FOR UPDATE")
        .fetch_one(&mut *tx)
        .await?
        .parse()
        .context("next_code_number setting is not numeric")?;
    let code = format!("#{next:02}");
    sqlx::query("UPDATE settings SET value = $1 WHERE key = 'next_code_number'")
      .bind((next + 1).to_string())
      .execute(&mut *tx)
      .await?;

    let inserted = sqlx::query_scalar::<_, i64>(
      r#"
      INSERT INTO participants (code, identity_key, tg_user_id, username, display_name)
      VALUES ($1, $2, $3, $4, $5)
      RETURNING id
      "#,
    )
    .bind(&code)
    .bind(&identity_key)
    .bind(tg_user_id)
    .bind(username)
    .bind(&display_name)
    .fetch_one(&mut *tx)
    .await;

    match inserted {
      Ok(id) => {
        tx.commit().await?;
        info!(code = %code, display_name = %display_name, participant_id = id, "new participant created");
        Ok(id)
      },
      Err(err) if is_unique_violation(&err) => {
        // Lost the creation race; the other writer owns the row now.
        drop(tx);
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM participants WHERE identity_key = $1")
          .bind(&identity_key)
          .fetch_one(&self.pool)
          .await?;
        Ok(id)
      },
      Err(err) => Err(err.into()),
    }
  }

  #[instrument(skip(self))]
  pub async fn delete_participant(&self, code: &str) -> Result<Option<RemovedParticipant>> {
    let mut tx = self.pool.begin().await?;
    let row = sqlx::query("SELECT id, display_name, points FROM participants WHERE code = $1")
      .bind(code)
      .fetch_optional(&mut *tx)
      .await?;
    let Some(row) = row else {
      return Ok(None);
    };
    let id: i64 = row.get("id");
    let removed = RemovedParticipant {
      code: code.to_string(),
      display_name: row.get("display_name"),
      points: row.get("points"),
    };

    // Submissions, adjustments and hashes go with the row via FK cascade.
    sqlx::query("DELETE FROM participants WHERE id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    warn!(
      code = %removed.code,
      display_name = %removed.display_name,
      points = removed.points,
      "participant deleted"
    );
    Ok(Some(removed))
  }

  // -------------------------------------------------------------------
  // Submissions
  // -------------------------------------------------------------------

  /// Credits one photo to a participant at most once. The uniqueness
  /// constraint on (participant_id, photo_file_id) decides: insert, point
  /// increment and counters commit together, or the violation reports a
  /// duplicate and nothing changes.
  #[instrument(skip(self))]
  pub async fn add_submission(
    &self,
    participant_id: i64,
    photo_file_id: &str,
    source: SubmissionSource,
    tg_message_id: Option<i64>,
  ) -> Result<SubmitOutcome> {
    let mut tx = self.pool.begin().await?;
    let week: i32 = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = 'current_week'")
      .fetch_optional(&mut *tx)
      .await?
      .and_then(|v| v.parse().ok())
      .unwrap_or(1);

    let inserted = sqlx::query(
      r#"
      INSERT INTO submissions (participant_id, photo_file_id, source, tg_message_id, week_number)
      VALUES ($1, $2, $3, $4, $5)
      "#,
    )
    .bind(participant_id)
    .bind(photo_file_id)
    .bind(source.as_str())
    .bind(tg_message_id)
    .bind(week)
    .execute(&mut *tx)
    .await;

    match inserted {
      Ok(_) => {
        sqlx::query("UPDATE participants SET points = points + 1, updated_at = now() WHERE id = $1")
          .bind(participant_id)
          .execute(&mut *tx)
          .await?;
        sqlx::query("UPDATE settings SET value = (value::bigint + 1)::text WHERE key = 'since_reset_total_submissions'")
          .execute(&mut *tx)
          .await?;
        tx.commit().await?;
        Ok(SubmitOutcome::Added)
      },
      Err(err) if is_unique_violation(&err) => {
        drop(tx);
        sqlx::query("UPDATE settings SET value = (value::bigint + 1)::text WHERE key = 'since_reset_duplicates'")
          .execute(&self.pool)
          .await?;
        Ok(SubmitOutcome::Duplicate)
      },
      Err(err) => Err(err.into()),
    }
  }

  // -------------------------------------------------------------------
  // Adjustments
  // -------------------------------------------------------------------

  /// Cumulative adjustments (no week) move the stored total, clamped at
  /// zero. Week-scoped adjustments are recorded only and surface through
  /// week-filtered leaderboard queries.
  #[instrument(skip(self))]
  pub async fn add_adjustment(
    &self,
    code: &str,
    delta: i64,
    admin_tg_user_id: i64,
    note: Option<&str>,
    week: Option<i32>,
  ) -> Result<Option<AdjustOutcome>> {
    let mut tx = self.pool.begin().await?;
    let row = sqlx::query("SELECT id, points, display_name FROM participants WHERE code = $1 FOR UPDATE")
      .bind(code)
      .fetch_optional(&mut *tx)
      .await?;
    let Some(row) = row else {
      return Ok(None);
    };
    let participant_id: i64 = row.get("id");
    let old_points: i64 = row.get("points");
    let display_name: String = row.get("display_name");

    let outcome = match week {
      None => {
        let new_points = util::apply_cumulative_delta(old_points, delta);
        sqlx::query("UPDATE participants SET points = $1, updated_at = now() WHERE id = $2")
          .bind(new_points)
          .bind(participant_id)
          .execute(&mut *tx)
          .await?;
        sqlx::query(
          r#"
          INSERT INTO adjustments (participant_id, delta, admin_tg_user_id, note, week_number)
          VALUES ($1, $2, $3, $4, NULL)
          "#,
        )
        .bind(participant_id)
        .bind(delta)
        .bind(admin_tg_user_id)
        .bind(note)
        .execute(&mut *tx)
        .await?;
        AdjustOutcome::Cumulative {
          display_name,
          old_points,
          new_points,
        }
      },
      Some(week) => {
        sqlx::query(
          r#"
          INSERT INTO adjustments (participant_id, delta, admin_tg_user_id, note, week_number)
          VALUES ($1, $2, $3, $4, $5)
          "#,
        )
        .bind(participant_id)
        .bind(delta)
        .bind(admin_tg_user_id)
        .bind(note)
        .bind(week)
        .execute(&mut *tx)
        .await?;
        AdjustOutcome::Weekly {
          display_name,
          week,
          delta,
        }
      },
    };

    sqlx::query("UPDATE settings SET value = (value::bigint + 1)::text WHERE key = 'since_reset_manual_adjustments'")
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    info!(code, delta, admin_tg_user_id, ?week, "adjustment recorded");
    Ok(Some(outcome))
  }

  /// Recounts submissions per participant and corrects any drift in the
  /// stored totals. Returns one entry per corrected participant; running
  /// it again immediately yields an empty list.
  #[instrument(skip(self))]
  pub async fn recalculate_points(&self) -> Result<Vec<PointsCorrection>> {
    let mut tx = self.pool.begin().await?;
    let rows = sqlx::query(
      r#"
      SELECT p.id, p.code, p.display_name, p.points AS old_points, COALESCE(s.cnt, 0)::bigint AS correct_points
      FROM participants p
      LEFT JOIN (
        SELECT participant_id, COUNT(*) AS cnt
        FROM submissions
        GROUP BY participant_id
      ) s ON s.participant_id = p.id
      WHERE p.points <> COALESCE(s.cnt, 0)
      ORDER BY p.code
      "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let mut corrections = Vec::with_capacity(rows.len());
    for row in rows {
      let id: i64 = row.get("id");
      let correct_points: i64 = row.get("correct_points");
      sqlx::query("UPDATE participants SET points = $1, updated_at = now() WHERE id = $2")
        .bind(correct_points)
        .bind(id)
        .execute(&mut *tx)
        .await?;
      corrections.push(PointsCorrection {
        code: row.get("code"),
        display_name: row.get("display_name"),
        old_points: row.get("old_points"),
        new_points: correct_points,
      });
    }
    tx.commit().await?;

    info!(corrected = corrections.len(), "recalculated cumulative points");
    Ok(corrections)
  }

  // -------------------------------------------------------------------
  // Leaderboard
  // -------------------------------------------------------------------

  /// Ranked view. Cumulative (`week = None`) reads the stored totals;
  /// week-scoped computes submissions-in-week plus adjustment deltas for
  /// that week. Ties go to the earliest first-seen participant.
  #[instrument(skip(self))]
  pub async fn leaderboard(&self, limit: i64, week: Option<i32>) -> Result<Vec<LeaderboardEntry>> {
    let rows = match week {
      None => {
        sqlx::query(
          r#"
          SELECT id, code, display_name, tg_user_id, username, points
          FROM participants
          WHERE points > 0
          ORDER BY points DESC, first_seen ASC
          LIMIT $1
          "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?
      },
      Some(week) => {
        sqlx::query(
          r#"
          SELECT
            p.id,
            p.code,
            p.display_name,
            p.tg_user_id,
            p.username,
            (COALESCE(s.cnt, 0) + COALESCE(a.total, 0))::bigint AS points
          FROM participants p
          LEFT JOIN (
            SELECT participant_id, COUNT(*) AS cnt
            FROM submissions
            WHERE week_number = $1
            GROUP BY participant_id
          ) s ON s.participant_id = p.id
          LEFT JOIN (
            SELECT participant_id, SUM(delta)::bigint AS total
            FROM adjustments
            WHERE week_number = $1
            GROUP BY participant_id
          ) a ON a.participant_id = p.id
          WHERE COALESCE(s.cnt, 0) + COALESCE(a.total, 0) > 0
          ORDER BY points DESC, p.first_seen ASC
          LIMIT $2
          "#,
        )
        .bind(week)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?
      },
    };

    Ok(
      rows
        .into_iter()
        .map(|row| LeaderboardEntry {
          participant_id: row.get("id"),
          code: row.get("code"),
          display_name: row.get("display_name"),
          tg_user_id: row.get("tg_user_id"),
          username: row.get("username"),
          points: row.get("points"),
        })
        .collect(),
    )
  }

  // -------------------------------------------------------------------
  // Week purge / restore
  // -------------------------------------------------------------------

  /// Moves a week's submissions and adjustments into the backup tables
  /// and deletes them. Participants stay; `restore_week_data` undoes it.
  #[instrument(skip(self))]
  pub async fn delete_week_data(&self, week: i32, admin_tg_user_id: i64) -> Result<PurgeSummary> {
    let mut tx = self.pool.begin().await?;
    let submissions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE week_number = $1")
      .bind(week)
      .fetch_one(&mut *tx)
      .await?;
    let adjustments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM adjustments WHERE week_number = $1")
      .bind(week)
      .fetch_one(&mut *tx)
      .await?;

    sqlx::query(
      r#"
      INSERT INTO deleted_submissions
        (original_id, participant_id, photo_file_id, source, tg_message_id,
         week_number, original_created_at, deleted_by_admin)
      SELECT id, participant_id, photo_file_id, source, tg_message_id,
             week_number, created_at, $2
      FROM submissions
      WHERE week_number = $1
      "#,
    )
    .bind(week)
    .bind(admin_tg_user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
      r#"
      INSERT INTO deleted_adjustments
        (original_id, participant_id, delta, admin_tg_user_id, note,
         week_number, original_created_at, deleted_by_admin)
      SELECT id, participant_id, delta, admin_tg_user_id, note,
             week_number, created_at, $2
      FROM adjustments
      WHERE week_number = $1
      "#,
    )
    .bind(week)
    .bind(admin_tg_user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM submissions WHERE week_number = $1")
      .bind(week)
      .execute(&mut *tx)
      .await?;
    sqlx::query("DELETE FROM adjustments WHERE week_number = $1")
      .bind(week)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    warn!(week, submissions, adjustments, admin_tg_user_id, "week data purged to backup");
    Ok(PurgeSummary {
      submissions,
      adjustments,
    })
  }

  /// Restores a purged week from the backup tables. Returns `None` when
  /// there is nothing backed up for that week. Re-inserting a submission
  /// that somehow reappeared in the meantime is skipped by the uniqueness
  /// constraint.
  #[instrument(skip(self))]
  pub async fn restore_week_data(&self, week: i32) -> Result<Option<PurgeSummary>> {
    let mut tx = self.pool.begin().await?;
    let submissions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deleted_submissions WHERE week_number = $1")
      .bind(week)
      .fetch_one(&mut *tx)
      .await?;
    let adjustments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deleted_adjustments WHERE week_number = $1")
      .bind(week)
      .fetch_one(&mut *tx)
      .await?;
    if submissions == 0 && adjustments == 0 {
      return Ok(None);
    }

    sqlx::query(
      r#"
      INSERT INTO submissions
        (participant_id, photo_file_id, source, tg_message_id, week_number, created_at)
      SELECT participant_id, photo_file_id, source, tg_message_id, week_number, original_created_at
      FROM deleted_submissions
      WHERE week_number = $1
      ON CONFLICT (participant_id, photo_file_id) DO NOTHING
      "#,
    )
    .bind(week)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
      r#"
      INSERT INTO adjustments
        (participant_id, delta, admin_tg_user_id, note, week_number, created_at)
      SELECT participant_id, delta, admin_tg_user_id, note, week_number, original_created_at
      FROM deleted_adjustments
      WHERE week_number = $1
      "#,
    )
    .bind(week)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM deleted_submissions WHERE week_number = $1")
      .bind(week)
      .execute(&mut *tx)
      .await?;
    sqlx::query("DELETE FROM deleted_adjustments WHERE week_number = $1")
      .bind(week)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    info!(week, submissions, adjustments, "week data restored from backup");
    Ok(Some(PurgeSummary {
      submissions,
      adjustments,
    }))
  }

  // -------------------------------------------------------------------
  // Winners
  // -------------------------------------------------------------------

  #[instrument(skip(self, entries))]
  pub async fn save_winners(&self, week: i32, entries: &[LeaderboardEntry]) -> Result<usize> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM winners WHERE week = $1")
      .bind(week)
      .execute(&mut *tx)
      .await?;
    for (index, entry) in entries.iter().enumerate() {
      sqlx::query(
        r#"
        INSERT INTO winners (week, rank, participant_id, points_at_time)
        VALUES ($1, $2, $3, $4)
        "#,
      )
      .bind(week)
      .bind(index as i32 + 1)
      .bind(entry.participant_id)
      .bind(entry.points)
      .execute(&mut *tx)
      .await?;
    }
    tx.commit().await?;
    info!(week, count = entries.len(), "winners saved");
    Ok(entries.len())
  }

  #[instrument(skip(self))]
  pub async fn winners(&self, week: i32) -> Result<Vec<WinnerRow>> {
    let rows = sqlx::query(
      r#"
      SELECT w.rank, p.code, p.display_name, w.points_at_time
      FROM winners w
      JOIN participants p ON w.participant_id = p.id
      WHERE w.week = $1
      ORDER BY w.rank ASC
      "#,
    )
    .bind(week)
    .fetch_all(&self.pool)
    .await?;
    Ok(
      rows
        .into_iter()
        .map(|row| WinnerRow {
          rank: row.get("rank"),
          code: row.get("code"),
          display_name: row.get("display_name"),
          points_at_time: row.get("points_at_time"),
        })
        .collect(),
    )
  }

  // -------------------------------------------------------------------
  // Stats
  // -------------------------------------------------------------------

  #[instrument(skip(self))]
  pub async fn stats(&self) -> Result<EngagementStats> {
    let current_week = self.current_week().await?;
    let week_label = self.week_label().await?;
    let active_participants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants WHERE points > 0")
      .fetch_one(&self.pool)
      .await?;
    let counter = |value: Option<String>| value.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0);
    let total_submissions = counter(self.setting("since_reset_total_submissions").await?);
    let duplicates = counter(self.setting("since_reset_duplicates").await?);
    let manual_adjustments = counter(self.setting("since_reset_manual_adjustments").await?);
    let reset_at = self.setting("reset_at").await?;

    let most_active = sqlx::query(
      r#"
      SELECT display_name, points
      FROM participants
      WHERE points > 0
      ORDER BY points DESC, first_seen ASC
      LIMIT 1
      "#,
    )
    .fetch_optional(&self.pool)
    .await?
    .map(|row| (row.get::<String, _>("display_name"), row.get::<i64, _>("points")));

    let avg_points: f64 =
      sqlx::query_scalar("SELECT COALESCE(AVG(points)::float8, 0) FROM participants WHERE points > 0")
        .fetch_one(&self.pool)
        .await?;

    Ok(EngagementStats {
      current_week,
      week_label,
      active_participants,
      total_submissions,
      duplicates,
      manual_adjustments,
      most_active,
      avg_points,
      reset_at,
    })
  }

  // -------------------------------------------------------------------
  // Reset
  // -------------------------------------------------------------------

  /// Wipes all tracked data and restarts codes at #01. Guarded by a
  /// confirmation step in the command surface.
  #[instrument(skip(self))]
  pub async fn reset_all(&self) -> Result<()> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM winners").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM photo_hashes").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM deleted_submissions").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM deleted_adjustments").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM adjustments").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM submissions").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM participants").execute(&mut *tx).await?;
    sqlx::query("UPDATE settings SET value = '1' WHERE key = 'next_code_number'")
      .execute(&mut *tx)
      .await?;
    for key in [
      "since_reset_total_submissions",
      "since_reset_duplicates",
      "since_reset_manual_adjustments",
    ] {
      sqlx::query("UPDATE settings SET value = '0' WHERE key = $1")
        .bind(key)
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("UPDATE settings SET value = now()::text WHERE key = 'reset_at'")
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    warn!("all data reset, codes restart at #01");
    Ok(())
  }

  // -------------------------------------------------------------------
  // Photo hashes (advisory fraud screening)
  // -------------------------------------------------------------------

  #[instrument(skip(self))]
  pub async fn add_photo_hash(&self, participant_id: i64, phash: &str) -> Result<()> {
    sqlx::query("INSERT INTO photo_hashes (participant_id, phash) VALUES ($1, $2)")
      .bind(participant_id)
      .bind(phash)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn photo_hashes(&self) -> Result<Vec<String>> {
    let hashes = sqlx::query_scalar::<_, String>("SELECT phash FROM photo_hashes")
      .fetch_all(&self.pool)
      .await?;
    Ok(hashes)
  }
}
