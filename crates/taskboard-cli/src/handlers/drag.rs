use crate::cli::DragArgs;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::{DragEnd, DragKind, DropPlan};
use uuid::Uuid;

pub async fn handle(ctx: &CliContext, args: DragArgs) -> anyhow::Result<()> {
    let drag: DragEnd = serde_json::from_str(&args.event)
        .map_err(|e| anyhow::anyhow!("Invalid drag event: {}", e))?;

    open_board_for(ctx, &drag).await?;
    let plan = ctx.drag_controller().handle_drag_end(&drag).await?;

    output::output_success(serde_json::json!({
        "applied": plan != DropPlan::Ignore,
        "board": ctx.current_board()?,
    }));
    Ok(())
}

/// Open the board the dragged item lives on.
///
/// Ids that do not parse are left for the drag controller to reject.
async fn open_board_for(ctx: &CliContext, drag: &DragEnd) -> anyhow::Result<()> {
    match drag.kind {
        DragKind::Card => {
            if let Ok(list_id) = Uuid::parse_str(&drag.source.container_id) {
                ctx.open_board_of_list(list_id).await?;
            }
        }
        DragKind::List => {
            let raw = drag
                .draggable_id
                .strip_prefix(ctx.config.effective_list_drag_prefix())
                .unwrap_or(&drag.draggable_id);
            if let Ok(list_id) = Uuid::parse_str(raw) {
                ctx.open_board_of_list(list_id).await?;
            }
        }
    }
    Ok(())
}
