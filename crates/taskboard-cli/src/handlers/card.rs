use chrono::{Duration, Utc};

use crate::cli::{CardAction, CardCreateArgs, CardUpdateArgs, RemindArgs};
use crate::context::CliContext;
use crate::handlers::description_update;
use crate::output;
use taskboard_core::TaskboardError;
use taskboard_domain::{CardPatch, FieldUpdate};

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    match action {
        CardAction::Create(args) => handle_create(ctx, args).await?,
        CardAction::Update(args) => handle_update(ctx, args).await?,
        CardAction::Delete { id } => {
            ctx.open_board_of_card(id).await?;
            ctx.controller.delete_card(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        CardAction::Move { id, list_id, index } => {
            let (_, card) = ctx.open_board_of_card(id).await?;
            ctx.controller
                .move_card(id, card.list_id, list_id, index.unwrap_or(usize::MAX))
                .await?;
            let board = ctx.current_board()?;
            match board.card(id) {
                Some(moved) => output::output_success(moved),
                None => output::output_error(&format!("Card not found: {}", id)),
            }
        }
        CardAction::Remind(args) => handle_remind(ctx, args).await?,
    }
    Ok(())
}

async fn handle_create(ctx: &CliContext, args: CardCreateArgs) -> anyhow::Result<()> {
    ctx.open_board_of_list(args.list_id).await?;
    let mut card = ctx
        .controller
        .create_card(args.list_id, &args.title, args.description)
        .await?;
    if let Some(at) = args.remind_at {
        let patch = CardPatch {
            reminder_date: FieldUpdate::Set(at),
            reminder_enabled: Some(true),
            ..Default::default()
        };
        card = ctx.controller.update_card(card.id, patch).await?;
    }
    output::output_success(&card);
    Ok(())
}

async fn handle_update(ctx: &CliContext, args: CardUpdateArgs) -> anyhow::Result<()> {
    ctx.open_board_of_card(args.id).await?;
    let patch = CardPatch {
        title: args.title,
        description: description_update(args.description, args.clear_description),
        ..Default::default()
    };
    let card = ctx.controller.update_card(args.id, patch).await?;
    output::output_success(&card);
    Ok(())
}

async fn handle_remind(ctx: &CliContext, args: RemindArgs) -> anyhow::Result<()> {
    ctx.open_board_of_card(args.id).await?;
    let patch = if args.off {
        CardPatch {
            reminder_enabled: Some(false),
            ..Default::default()
        }
    } else {
        let at = match (args.at, args.in_minutes) {
            (Some(at), _) => at,
            (None, Some(minutes)) => Duration::try_minutes(minutes)
                .and_then(|d| Utc::now().checked_add_signed(d))
                .ok_or_else(|| {
                    TaskboardError::Validation(format!("--in-minutes {} is out of range", minutes))
                })?,
            (None, None) => anyhow::bail!("one of --at, --in-minutes or --off is required"),
        };
        CardPatch {
            reminder_date: FieldUpdate::Set(at),
            reminder_enabled: Some(true),
            ..Default::default()
        }
    };
    let card = ctx.controller.update_card(args.id, patch).await?;
    output::output_success(&card);
    Ok(())
}
