use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::UpdateHandler;
use teloxide::dispatching::dialogue::Dialogue;
use teloxide::dptree;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::bot::Command;
use crate::bot::DialogueStorage;
use crate::bot::HandlerResult;
use crate::bot::context::AppContext;
use crate::bot::forward::ForwardItem;
use crate::bot::forward::ForwardedSender;
use crate::bot::state::ConversationState;
use crate::fraud;
use crate::leaderboard;
use crate::models::AdjustOutcome;
use crate::models::SubmissionSource;
use crate::models::SubmitOutcome;
use crate::models::WinnerRow;
use crate::util;

type SharedContext = Arc<AppContext>;
type BotDialogue = Dialogue<ConversationState, DialogueStorage>;

pub fn build_schema() -> UpdateHandler<anyhow::Error> {
  let message_handler = Update::filter_message()
    .enter_dialogue::<Message, DialogueStorage, ConversationState>()
    .branch(command_branch())
    .branch(dptree::case![ConversationState::ConfirmReset { admin_tg_id }].endpoint(handle_confirm_reset))
    .branch(dptree::case![ConversationState::ConfirmPurge { admin_tg_id, week }].endpoint(handle_confirm_purge))
    .branch(dptree::endpoint(handle_message));

  dptree::entry().branch(message_handler)
}

fn command_branch() -> UpdateHandler<anyhow::Error> {
  dptree::entry().filter_command::<Command>().endpoint(handle_command)
}

#[instrument(skip(bot, dialogue, ctx, msg, cmd))]
async fn handle_command(
  bot: Bot,
  dialogue: BotDialogue,
  ctx: SharedContext,
  msg: Message,
  cmd: Command,
) -> HandlerResult {
  // A fresh command supersedes any confirmation that was left hanging.
  dialogue.reset().await?;

  match cmd {
    Command::Start => return handle_start(&bot, &ctx, &msg).await,
    Command::Help => return handle_help(&bot, &msg).await,
    Command::Rank => return handle_rank(&bot, &ctx, &msg).await,
    _ => {},
  }

  let Some(admin_id) = require_admin_dm(&bot, &ctx, &msg).await? else {
    return Ok(());
  };

  match cmd {
    Command::Board(args) => handle_board(&bot, &ctx, &msg, &args).await,
    Command::Stats => handle_stats(&bot, &ctx, &msg).await,
    Command::Adjust(args) => handle_adjust(&bot, &ctx, &msg, admin_id, &args).await,
    Command::WeekAdjust(args) => handle_week_adjust(&bot, &ctx, &msg, admin_id, &args).await,
    Command::SetWeek(args) => handle_set_week(&bot, &ctx, &msg, &args).await,
    Command::NewWeek(args) => handle_new_week(&bot, &ctx, &msg, &args).await,
    Command::RemoveUser(args) => handle_remove_user(&bot, &ctx, &msg, &args).await,
    Command::Recalc => handle_recalc(&bot, &ctx, &msg).await,
    Command::RemoveData(args) => handle_remove_data(&bot, &dialogue, &msg, admin_id, &args).await,
    Command::UndoData(args) => handle_undo_data(&bot, &ctx, &msg, &args).await,
    Command::SelectWinners(args) => handle_select_winners(&bot, &ctx, &msg, &args).await,
    Command::Winners(args) => handle_winners(&bot, &ctx, &msg, &args).await,
    Command::PointsOn => handle_points_toggle(&bot, &ctx, &msg, true).await,
    Command::PointsOff => handle_points_toggle(&bot, &ctx, &msg, false).await,
    Command::ResetAll => handle_reset_all(&bot, &dialogue, &msg, admin_id).await,
    Command::Start | Command::Help | Command::Rank => Ok(()),
  }
}

/// Admin commands work only for configured admins and only in a private
/// chat; everyone else gets a refusal and no state changes.
async fn require_admin_dm(bot: &Bot, ctx: &SharedContext, msg: &Message) -> Result<Option<i64>> {
  let Some(user) = msg.from.as_ref() else {
    return Ok(None);
  };
  let user_id = user.id.0 as i64;
  if !ctx.is_admin(user_id) {
    bot.send_message(msg.chat.id, "⛔ This command is admin-only.").await?;
    return Ok(None);
  }
  if !msg.chat.is_private() {
    bot.send_message(msg.chat.id, "⛔ This command only works in DMs.").await?;
    return Ok(None);
  }
  Ok(Some(user_id))
}

// ---------------------------------------------------------------------
// Public commands
// ---------------------------------------------------------------------

#[instrument(skip(bot, ctx, msg))]
async fn handle_start(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  let mut text =
    "📊 I track photo submissions in the challenge topic and keep the leaderboard.\nUse /rank to see the top 10."
      .to_string();
  if let Some(user) = msg.from.as_ref()
    && ctx.is_admin(user.id.0 as i64)
  {
    text.push_str("\n\nAdmins: forward photos from the topic to me here to log them, or see /help for commands.");
  }
  bot.send_message(msg.chat.id, text).await?;
  Ok(())
}

#[instrument(skip(bot, msg))]
async fn handle_help(bot: &Bot, msg: &Message) -> HandlerResult {
  info!(chat_id = %msg.chat.id, "received /help command");
  let mut text = Command::descriptions().to_string();
  text.push_str("\n\nPost photos in the challenge topic to earn points. One point per unique photo.");
  bot.send_message(msg.chat.id, text).await?;
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_rank(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  let (entries, show_points) = futures::try_join!(
    ctx.db().leaderboard(leaderboard::PUBLIC_TOP_N, None),
    ctx.db().show_points()
  )?;
  info!(chat_id = %msg.chat.id, count = entries.len(), show_points, "sending public leaderboard");
  bot
    .send_message(msg.chat.id, leaderboard::render_public_board(&entries, show_points))
    .await?;
  Ok(())
}

// ---------------------------------------------------------------------
// Admin commands
// ---------------------------------------------------------------------

#[instrument(skip(bot, ctx, msg))]
async fn handle_board(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let week = match args.trim() {
    "" => None,
    raw => match util::parse_week(raw) {
      Ok(week) => Some(week),
      Err(err) => {
        bot.send_message(msg.chat.id, format!("⚠️ {err}")).await?;
        return Ok(());
      },
    },
  };

  let (entries, show_points) = futures::try_join!(
    ctx.db().leaderboard(leaderboard::ADMIN_TOP_N, week),
    ctx.db().show_points()
  )?;
  let scope = match week {
    None => "All Time".to_string(),
    Some(week) => format!("Week {week}"),
  };
  bot
    .send_message(msg.chat.id, leaderboard::render_admin_board(&entries, &scope, show_points))
    .await?;
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_stats(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  let stats = ctx.db().stats().await?;
  bot.send_message(msg.chat.id, leaderboard::render_stats(&stats)).await?;
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_adjust(bot: &Bot, ctx: &SharedContext, msg: &Message, admin_id: i64, args: &str) -> HandlerResult {
  let parsed = match util::parse_adjust_args(args) {
    Ok(parsed) => parsed,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /adjust <code> <delta> [note]"))
        .await?;
      return Ok(());
    },
  };
  apply_adjustment(bot, ctx, msg, admin_id, &parsed.code, parsed.delta, parsed.note.as_deref(), None).await
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_week_adjust(bot: &Bot, ctx: &SharedContext, msg: &Message, admin_id: i64, args: &str) -> HandlerResult {
  let parsed = match util::parse_week_adjust_args(args) {
    Ok(parsed) => parsed,
    Err(err) => {
      bot
        .send_message(
          msg.chat.id,
          format!("⚠️ {err}\nUsage: /weekadjust <code> <week> <delta> [note]"),
        )
        .await?;
      return Ok(());
    },
  };
  apply_adjustment(
    bot,
    ctx,
    msg,
    admin_id,
    &parsed.code,
    parsed.delta,
    parsed.note.as_deref(),
    Some(parsed.week),
  )
  .await
}

#[allow(clippy::too_many_arguments)]
async fn apply_adjustment(
  bot: &Bot,
  ctx: &SharedContext,
  msg: &Message,
  admin_id: i64,
  code: &str,
  delta: i64,
  note: Option<&str>,
  week: Option<i32>,
) -> HandlerResult {
  match ctx.db().add_adjustment(code, delta, admin_id, note, week).await {
    Ok(Some(outcome)) => {
      bot.send_message(msg.chat.id, render_adjust_outcome(&outcome)).await?;
    },
    Ok(None) => {
      bot
        .send_message(msg.chat.id, format!("❓ Participant {code} not found."))
        .await?;
    },
    Err(err) => {
      warn!(error = %err, code, admin_id, "failed to store adjustment");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, adjustment not applied. Try again later.")
        .await?;
    },
  }
  Ok(())
}

fn render_adjust_outcome(outcome: &AdjustOutcome) -> String {
  match outcome {
    AdjustOutcome::Cumulative {
      display_name,
      old_points,
      new_points,
    } => format!("✅ {display_name}: {old_points} → {new_points} pts (cumulative)"),
    AdjustOutcome::Weekly {
      display_name,
      week,
      delta,
    } => format!("✅ {display_name}: {delta:+} pts for week {week} (cumulative total unchanged)"),
  }
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_set_week(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let (week, label) = match util::parse_week_and_label(args) {
    Ok(parsed) => parsed,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /setweek <week> [label]"))
        .await?;
      return Ok(());
    },
  };
  match ctx.db().set_current_week(week, label.as_deref()).await {
    Ok((week, label)) => {
      bot
        .send_message(
          msg.chat.id,
          format!("📅 Current week set to {week} ({label}). New submissions are stamped with it."),
        )
        .await?;
    },
    Err(err) => {
      warn!(error = %err, week, "failed to set current week");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, week not changed. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_new_week(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let label = util::parse_optional_label(args);
  match ctx.db().start_new_week(label.as_deref()).await {
    Ok(change) => {
      bot
        .send_message(
          msg.chat.id,
          format!(
            "📅 {} → {} (week {} → {}). All history is preserved.",
            change.old_label, change.new_label, change.old_week, change.new_week
          ),
        )
        .await?;
    },
    Err(err) => {
      warn!(error = %err, "failed to start new week");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, week not changed. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_remove_user(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let code = match util::normalize_code(args) {
    Ok(code) => code,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /removeuser <code>"))
        .await?;
      return Ok(());
    },
  };
  match ctx.db().delete_participant(&code).await {
    Ok(Some(removed)) => {
      bot
        .send_message(
          msg.chat.id,
          format!(
            "🗑️ Removed {} ({}) - {} pts and all their submissions deleted.",
            removed.code, removed.display_name, removed.points
          ),
        )
        .await?;
    },
    Ok(None) => {
      bot
        .send_message(msg.chat.id, format!("❓ Participant {code} not found."))
        .await?;
    },
    Err(err) => {
      warn!(error = %err, code, "failed to remove participant");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, nothing removed. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_recalc(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  match ctx.db().recalculate_points().await {
    Ok(corrections) => {
      bot
        .send_message(msg.chat.id, leaderboard::render_corrections(&corrections))
        .await?;
    },
    Err(err) => {
      warn!(error = %err, "failed to recalculate points");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, totals unchanged. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, dialogue, msg))]
async fn handle_remove_data(
  bot: &Bot,
  dialogue: &BotDialogue,
  msg: &Message,
  admin_id: i64,
  args: &str,
) -> HandlerResult {
  let week = match util::parse_required_week(args) {
    Ok(week) => week,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /removedata <week>"))
        .await?;
      return Ok(());
    },
  };
  dialogue
    .update(ConversationState::ConfirmPurge {
      admin_tg_id: admin_id,
      week,
    })
    .await?;
  bot
    .send_message(
      msg.chat.id,
      format!(
        "⚠️ This deletes every submission and adjustment of week {week}. A backup is kept and /undodata {week} \
         restores it.\nType confirm to proceed, anything else cancels."
      ),
    )
    .await?;
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_undo_data(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let week = match util::parse_required_week(args) {
    Ok(week) => week,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /undodata <week>"))
        .await?;
      return Ok(());
    },
  };
  match ctx.db().restore_week_data(week).await {
    Ok(Some(summary)) => {
      bot
        .send_message(
          msg.chat.id,
          format!(
            "♻️ Week {week} restored: {} submissions, {} adjustments.\nRun /recalc to refresh cumulative totals.",
            summary.submissions, summary.adjustments
          ),
        )
        .await?;
    },
    Ok(None) => {
      bot
        .send_message(msg.chat.id, format!("❓ No backup data found for week {week}."))
        .await?;
    },
    Err(err) => {
      warn!(error = %err, week, "failed to restore week data");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, nothing restored. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_select_winners(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let week = match util::parse_required_week(args) {
    Ok(week) => week,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /selectwinners <week>"))
        .await?;
      return Ok(());
    },
  };
  let entries = ctx.db().leaderboard(leaderboard::WINNER_COUNT, Some(week)).await?;
  if entries.is_empty() {
    bot
      .send_message(msg.chat.id, format!("❌ No submissions for week {week}."))
      .await?;
    return Ok(());
  }
  match ctx.db().save_winners(week, &entries).await {
    Ok(count) => {
      info!(week, count, "winners selected");
      let winners: Vec<WinnerRow> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| WinnerRow {
          rank: idx as i32 + 1,
          code: entry.code.clone(),
          display_name: entry.display_name.clone(),
          points_at_time: entry.points,
        })
        .collect();
      bot
        .send_message(msg.chat.id, leaderboard::render_winners_selected(week, &winners))
        .await?;
    },
    Err(err) => {
      warn!(error = %err, week, "failed to save winners");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, winners not saved. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_winners(bot: &Bot, ctx: &SharedContext, msg: &Message, args: &str) -> HandlerResult {
  let week = match util::parse_required_week(args) {
    Ok(week) => week,
    Err(err) => {
      bot
        .send_message(msg.chat.id, format!("⚠️ {err}\nUsage: /winners <week>"))
        .await?;
      return Ok(());
    },
  };
  let winners = ctx.db().winners(week).await?;
  bot
    .send_message(msg.chat.id, leaderboard::render_saved_winners(week, &winners))
    .await?;
  Ok(())
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_points_toggle(bot: &Bot, ctx: &SharedContext, msg: &Message, show: bool) -> HandlerResult {
  match ctx.db().set_show_points(show).await {
    Ok(()) => {
      let text = if show {
        "✅ Points display enabled for the public board."
      } else {
        "✅ Points display disabled for the public board."
      };
      bot.send_message(msg.chat.id, text).await?;
    },
    Err(err) => {
      warn!(error = %err, show, "failed to toggle points display");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, setting unchanged. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, dialogue, msg))]
async fn handle_reset_all(bot: &Bot, dialogue: &BotDialogue, msg: &Message, admin_id: i64) -> HandlerResult {
  dialogue
    .update(ConversationState::ConfirmReset { admin_tg_id: admin_id })
    .await?;
  bot
    .send_message(
      msg.chat.id,
      "⚠️ This wipes ALL participants, submissions, adjustments and winners, and restarts codes at #01.\nType \
       confirm to proceed, anything else cancels.",
    )
    .await?;
  Ok(())
}

// ---------------------------------------------------------------------
// Confirmation replies
// ---------------------------------------------------------------------

fn is_confirmation(msg: &Message) -> bool {
  msg
    .text()
    .map(|text| text.trim().eq_ignore_ascii_case("confirm"))
    .unwrap_or(false)
}

#[instrument(skip(bot, dialogue, ctx, msg))]
async fn handle_confirm_reset(
  bot: Bot,
  dialogue: BotDialogue,
  ctx: SharedContext,
  msg: Message,
  admin_tg_id: i64,
) -> HandlerResult {
  let Some(user) = msg.from.as_ref() else {
    return Ok(());
  };
  if user.id.0 as i64 != admin_tg_id {
    bot
      .send_message(msg.chat.id, "Only the admin who started this action can respond.")
      .await?;
    return Ok(());
  }

  dialogue.reset().await?;
  if !is_confirmation(&msg) {
    bot.send_message(msg.chat.id, "❌ Reset cancelled.").await?;
    return Ok(());
  }

  match ctx.db().reset_all().await {
    Ok(()) => {
      info!(admin_tg_id, "full reset confirmed");
      bot
        .send_message(msg.chat.id, "🧹 All data wiped. Codes restart at #01.")
        .await?;
    },
    Err(err) => {
      warn!(error = %err, admin_tg_id, "failed to reset data");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, nothing was wiped. Try again later.")
        .await?;
    },
  }
  Ok(())
}

#[instrument(skip(bot, dialogue, ctx, msg))]
async fn handle_confirm_purge(
  bot: Bot,
  dialogue: BotDialogue,
  ctx: SharedContext,
  msg: Message,
  pending: (i64, i32),
) -> HandlerResult {
  let (admin_tg_id, week) = pending;
  let Some(user) = msg.from.as_ref() else {
    return Ok(());
  };
  if user.id.0 as i64 != admin_tg_id {
    bot
      .send_message(msg.chat.id, "Only the admin who started this action can respond.")
      .await?;
    return Ok(());
  }

  dialogue.reset().await?;
  if !is_confirmation(&msg) {
    bot
      .send_message(msg.chat.id, format!("❌ Week {week} purge cancelled."))
      .await?;
    return Ok(());
  }

  match ctx.db().delete_week_data(week, admin_tg_id).await {
    Ok(summary) => {
      bot
        .send_message(
          msg.chat.id,
          format!(
            "🗑️ Week {week} data deleted:\n• {} submissions removed\n• {} adjustments removed\nParticipants remain \
             intact. Use /undodata {week} to restore.",
            summary.submissions, summary.adjustments
          ),
        )
        .await?;
    },
    Err(err) => {
      warn!(error = %err, week, admin_tg_id, "failed to purge week data");
      bot
        .send_message(msg.chat.id, "⚠️ Storage error, nothing was deleted. Try again later.")
        .await?;
    },
  }
  Ok(())
}

// ---------------------------------------------------------------------
// Photo ingestion
// ---------------------------------------------------------------------

#[instrument(skip(bot, ctx, msg))]
async fn handle_message(bot: Bot, ctx: SharedContext, msg: Message) -> HandlerResult {
  if msg.photo().is_none() {
    return Ok(());
  }
  if in_tracked_topic(&ctx, &msg) {
    return handle_topic_photo(&bot, &ctx, &msg).await;
  }
  if msg.chat.is_private() {
    return handle_dm_photo(&bot, &ctx, &msg).await;
  }
  Ok(())
}

fn in_tracked_topic(ctx: &SharedContext, msg: &Message) -> bool {
  msg.chat.id.0 == ctx.config().chat_id && msg.thread_id.map(|thread| thread.0.0) == Some(ctx.config().topic_id)
}

/// Live path: a photo posted in the tracked topic. Credits the sender
/// directly; failures are logged and the event is dropped.
async fn handle_topic_photo(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  let Some(user) = msg.from.as_ref() else {
    debug!(message_id = %msg.id, "topic photo without a sender, skipping");
    return Ok(());
  };
  if user.is_bot {
    return Ok(());
  }
  let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
    return Ok(());
  };

  let user_id = user.id.0 as i64;
  let photo_file_id = photo.file.id.to_string();
  let result = async {
    let participant_id = ctx
      .db()
      .resolve_participant(Some(user_id), user.username.as_deref(), &user.full_name())
      .await?;
    let outcome = ctx
      .db()
      .add_submission(participant_id, &photo_file_id, SubmissionSource::Topic, Some(msg.id.0 as i64))
      .await?;
    Ok::<_, anyhow::Error>((participant_id, outcome))
  }
  .await;

  match result {
    Ok((participant_id, SubmitOutcome::Added)) => {
      info!(user_id, participant_id, message_id = %msg.id, "topic submission credited");
      if ctx.config().fraud_screening {
        screen_photo(bot, ctx, participant_id, &photo.file.id).await;
      }
    },
    Ok((participant_id, SubmitOutcome::Duplicate)) => {
      info!(user_id, participant_id, message_id = %msg.id, "duplicate topic photo ignored");
    },
    Err(err) => {
      warn!(error = %err, user_id, message_id = %msg.id, "failed to ingest topic photo");
    },
  }
  Ok(())
}

/// DM path: forwarded photos from admins feed the per-admin batch queue.
async fn handle_dm_photo(bot: &Bot, ctx: &SharedContext, msg: &Message) -> HandlerResult {
  let Some(user) = msg.from.as_ref() else {
    return Ok(());
  };
  let admin_id = user.id.0 as i64;
  if !ctx.is_admin(admin_id) {
    debug!(user_id = admin_id, "ignoring DM photo from non-admin");
    return Ok(());
  }
  let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
    return Ok(());
  };

  let Some(origin) = msg.forward_origin() else {
    bot
      .send_message(msg.chat.id, "ℹ️ Forward photos from the topic to add them to the board.")
      .await?;
    return Ok(());
  };

  let item = ForwardItem {
    sender: ForwardedSender::from_origin(origin),
    photo_file_id: photo.file.id.to_string(),
    tg_message_id: msg.id.0 as i64,
  };
  ctx.forwards().enqueue(bot, &ctx, msg.chat.id, admin_id, item).await;
  Ok(())
}

/// Advisory similarity screening of an accepted photo. Best effort: any
/// failure here is logged and forgotten, the point already stands.
async fn screen_photo(bot: &Bot, ctx: &SharedContext, participant_id: i64, file_id: &FileId) {
  let result = async {
    let file = bot.get_file(file_id.clone()).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;
    fraud::advisory_check(ctx.db(), participant_id, &bytes).await
  }
  .await;
  if let Err(err) = result {
    debug!(error = %err, participant_id, "photo screening skipped");
  }
}
