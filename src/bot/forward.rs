//! Batch ingestion of photos forwarded to an admin's DM. Each admin gets
//! at most one worker at a time; a burst of forwards becomes one status
//! message edited in place, then one summary, instead of a reply per
//! photo.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::types::MessageId;
use teloxide::types::MessageOrigin;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::bot::context::AppContext;
use crate::leaderboard;
use crate::models::SubmissionSource;
use crate::models::SubmitOutcome;

/// Edit the status message after this many photos...
const PROGRESS_EVERY: usize = 10;
/// ...or after this long with at least one unreported photo.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(3);
/// An empty queue for this long ends the burst.
const IDLE_DRAIN: Duration = Duration::from_secs(12);

/// What the forward's origin tells us about the submitter, already
/// normalized at the transport boundary. Chat and channel origins carry
/// no person to credit.
#[derive(Debug, Clone)]
pub enum ForwardedSender {
  Known {
    tg_user_id: i64,
    username: Option<String>,
    full_name: String,
  },
  Hidden {
    display_name: String,
  },
  Uncreditable,
}

impl ForwardedSender {
  pub fn from_origin(origin: &MessageOrigin) -> Self {
    match origin {
      MessageOrigin::User { sender_user, .. } => Self::Known {
        tg_user_id: sender_user.id.0 as i64,
        username: sender_user.username.clone(),
        full_name: sender_user.full_name(),
      },
      MessageOrigin::HiddenUser { sender_user_name, .. } => {
        let name = sender_user_name.trim();
        if name.is_empty() {
          Self::Uncreditable
        } else {
          Self::Hidden {
            display_name: name.to_string(),
          }
        }
      },
      MessageOrigin::Chat { .. } | MessageOrigin::Channel { .. } => Self::Uncreditable,
    }
  }
}

#[derive(Debug)]
pub struct ForwardItem {
  pub sender: ForwardedSender,
  pub photo_file_id: String,
  pub tg_message_id: i64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchTally {
  pub received: usize,
  pub added: usize,
  pub duplicates: usize,
  pub failed: usize,
}

/// Progress-edit throttle: fires on every `PROGRESS_EVERY`th processed
/// item, or once `PROGRESS_INTERVAL` has passed with anything pending.
struct EditGate {
  processed_since_edit: usize,
  last_edit: Instant,
}

impl EditGate {
  fn new(now: Instant) -> Self {
    Self {
      processed_since_edit: 0,
      last_edit: now,
    }
  }

  fn record(&mut self) {
    self.processed_since_edit += 1;
  }

  fn should_edit(&self, now: Instant) -> bool {
    self.processed_since_edit >= PROGRESS_EVERY
      || (self.processed_since_edit > 0 && now.duration_since(self.last_edit) >= PROGRESS_INTERVAL)
  }

  fn reset(&mut self, now: Instant) {
    self.processed_since_edit = 0;
    self.last_edit = now;
  }
}

/// One unbounded queue per admin currently forwarding. Absent entry =
/// idle; present entry = a worker is consuming that admin's burst.
#[derive(Default)]
pub struct ForwardQueues {
  queues: Mutex<HashMap<i64, mpsc::UnboundedSender<ForwardItem>>>,
}

impl ForwardQueues {
  /// Enqueues one forwarded photo, spawning the admin's worker if none is
  /// running. Items from one admin are processed strictly in this order.
  pub async fn enqueue(&self, bot: &Bot, ctx: &Arc<AppContext>, admin_chat: ChatId, admin_id: i64, item: ForwardItem) {
    let mut queues = self.queues.lock().await;
    let mut item = item;
    if let Some(tx) = queues.get(&admin_id) {
      match tx.send(item) {
        Ok(()) => return,
        // Worker wound down but has not deregistered yet; start fresh.
        Err(mpsc::error::SendError(returned)) => item = returned,
      }
    }

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(item).expect("receiver held by this scope");
    queues.insert(admin_id, tx);
    drop(queues);

    let bot = bot.clone();
    let ctx = Arc::clone(ctx);
    tokio::spawn(async move {
      run_worker(bot, ctx, admin_chat, admin_id, rx).await;
    });
  }

  pub async fn deregister(&self, admin_id: i64) {
    self.queues.lock().await.remove(&admin_id);
  }
}

#[instrument(skip(bot, ctx, rx))]
async fn run_worker(
  bot: Bot,
  ctx: Arc<AppContext>,
  admin_chat: ChatId,
  admin_id: i64,
  mut rx: mpsc::UnboundedReceiver<ForwardItem>,
) {
  info!(admin_id, "forward burst started");
  let status = match bot.send_message(admin_chat, "⏳ Processing forwarded photos...").await {
    Ok(message) => Some(message.id),
    Err(err) => {
      warn!(error = %err, admin_id, "could not send batch status message");
      None
    },
  };

  let mut tally = BatchTally::default();
  let mut gate = EditGate::new(Instant::now());
  let mut idle = Duration::ZERO;

  loop {
    match timeout(PROGRESS_INTERVAL, rx.recv()).await {
      Ok(Some(item)) => {
        idle = Duration::ZERO;
        process_item(&ctx, admin_id, item, &mut tally).await;
        gate.record();
        maybe_edit_status(&bot, admin_chat, admin_id, status, &tally, &mut gate).await;
      },
      Ok(None) => break,
      Err(_) => {
        // Quiet tick: flush any progress still unreported, and give up
        // on the burst once the queue has stayed empty long enough.
        maybe_edit_status(&bot, admin_chat, admin_id, status, &tally, &mut gate).await;
        idle += PROGRESS_INTERVAL;
        if idle >= IDLE_DRAIN {
          break;
        }
      },
    }
  }

  // Deregister before draining stragglers: anything arriving after this
  // point starts a fresh burst with its own worker and counters.
  ctx.forwards().deregister(admin_id).await;
  while let Ok(item) = rx.try_recv() {
    process_item(&ctx, admin_id, item, &mut tally).await;
  }

  let summary = match ctx.db().leaderboard(leaderboard::WINNER_COUNT, None).await {
    Ok(top) => format!("{}\n\n{}", render_summary(&tally), leaderboard::render_top_snapshot(&top)),
    Err(err) => {
      warn!(error = %err, admin_id, "could not load leaderboard for batch summary");
      render_summary(&tally)
    },
  };
  if let Err(err) = bot.send_message(admin_chat, summary).await {
    warn!(error = %err, admin_id, "could not send batch summary");
  }

  info!(
    admin_id,
    received = tally.received,
    added = tally.added,
    duplicates = tally.duplicates,
    failed = tally.failed,
    "forward burst drained"
  );
}

async fn maybe_edit_status(
  bot: &Bot,
  admin_chat: ChatId,
  admin_id: i64,
  status: Option<MessageId>,
  tally: &BatchTally,
  gate: &mut EditGate,
) {
  if !gate.should_edit(Instant::now()) {
    return;
  }
  if let Some(message_id) = status {
    // Edit failures (deleted status message, rate limiting) must not
    // disturb the accounting.
    if let Err(err) = bot.edit_message_text(admin_chat, message_id, render_progress(tally)).await {
      debug!(error = %err, admin_id, "batch status edit failed");
    }
  }
  gate.reset(Instant::now());
}

/// Resolves and credits one forwarded photo. Every failure mode ends in a
/// counter bump, never in tearing down the worker.
async fn process_item(ctx: &AppContext, admin_id: i64, item: ForwardItem, tally: &mut BatchTally) {
  tally.received += 1;

  let resolved = match &item.sender {
    ForwardedSender::Uncreditable => {
      info!(admin_id, tg_message_id = item.tg_message_id, "skipping forward without a creditable sender");
      tally.failed += 1;
      return;
    },
    ForwardedSender::Known {
      tg_user_id,
      username,
      full_name,
    } => {
      ctx
        .db()
        .resolve_participant(Some(*tg_user_id), username.as_deref(), full_name)
        .await
    },
    ForwardedSender::Hidden { display_name } => ctx.db().resolve_participant(None, None, display_name).await,
  };

  let participant_id = match resolved {
    Ok(id) => id,
    Err(err) => {
      warn!(error = %err, admin_id, "could not resolve forwarded sender");
      tally.failed += 1;
      return;
    },
  };

  match ctx
    .db()
    .add_submission(
      participant_id,
      &item.photo_file_id,
      SubmissionSource::Forward,
      Some(item.tg_message_id),
    )
    .await
  {
    Ok(SubmitOutcome::Added) => tally.added += 1,
    Ok(SubmitOutcome::Duplicate) => tally.duplicates += 1,
    Err(err) => {
      warn!(error = %err, admin_id, participant_id, "could not store forwarded submission");
      tally.failed += 1;
    },
  }
}

fn render_progress(tally: &BatchTally) -> String {
  format!(
    "⏳ Processing forwarded photos...\nReceived {} | Added {} | Duplicates {} | Failed {}",
    tally.received, tally.added, tally.duplicates, tally.failed
  )
}

fn render_summary(tally: &BatchTally) -> String {
  [
    "✅ Forward batch complete".to_string(),
    format!("📸 Received: {}", tally.received),
    format!("🆕 Added: {}", tally.added),
    format!("⏭️ Duplicates: {}", tally.duplicates),
    format!("⚠️ Failed: {}", tally.failed),
  ]
  .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gate_fires_after_ten_items() {
    let start = Instant::now();
    let mut gate = EditGate::new(start);
    for _ in 0 .. 9 {
      gate.record();
      assert!(!gate.should_edit(start));
    }
    gate.record();
    assert!(gate.should_edit(start));
  }

  #[test]
  fn gate_fires_after_interval_with_pending_items() {
    let start = Instant::now();
    let mut gate = EditGate::new(start);
    gate.record();
    assert!(!gate.should_edit(start + Duration::from_secs(1)));
    assert!(gate.should_edit(start + PROGRESS_INTERVAL));
  }

  #[test]
  fn gate_never_fires_with_nothing_pending() {
    let start = Instant::now();
    let gate = EditGate::new(start);
    assert!(!gate.should_edit(start + Duration::from_secs(60)));
  }

  #[test]
  fn gate_reset_starts_a_new_window() {
    let start = Instant::now();
    let mut gate = EditGate::new(start);
    for _ in 0 .. 10 {
      gate.record();
    }
    let reset_at = start + Duration::from_secs(1);
    gate.reset(reset_at);
    assert!(!gate.should_edit(reset_at));
    gate.record();
    assert!(gate.should_edit(reset_at + PROGRESS_INTERVAL));
  }

  #[test]
  fn rapid_burst_of_25_coalesces_to_at_most_three_edits() {
    // All items land at the same instant, so only the count rule fires:
    // two intermediate edits (at 10 and 20), the tail goes to the final
    // summary. Upper bound either way is ceil(25 / 10) = 3.
    let start = Instant::now();
    let mut gate = EditGate::new(start);
    let mut edits = 0;
    for _ in 0 .. 25 {
      gate.record();
      if gate.should_edit(start) {
        edits += 1;
        gate.reset(start);
      }
    }
    assert_eq!(edits, 2);
    assert!(edits <= 25_usize.div_ceil(10));
  }

  #[test]
  fn progress_line_reports_all_counters() {
    let tally = BatchTally {
      received: 12,
      added: 9,
      duplicates: 2,
      failed: 1,
    };
    let line = render_progress(&tally);
    assert!(line.contains("Received 12"));
    assert!(line.contains("Added 9"));
    assert!(line.contains("Duplicates 2"));
    assert!(line.contains("Failed 1"));
  }

  #[test]
  fn summary_reports_all_counters() {
    let tally = BatchTally {
      received: 25,
      added: 20,
      duplicates: 4,
      failed: 1,
    };
    let summary = render_summary(&tally);
    assert!(summary.starts_with("✅ Forward batch complete"));
    assert!(summary.contains("📸 Received: 25"));
    assert!(summary.contains("🆕 Added: 20"));
    assert!(summary.contains("⏭️ Duplicates: 4"));
    assert!(summary.contains("⚠️ Failed: 1"));
  }
}
