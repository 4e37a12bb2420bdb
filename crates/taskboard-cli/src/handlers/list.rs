use crate::cli::ListAction;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::ListPatch;

pub async fn handle(ctx: &CliContext, action: ListAction) -> anyhow::Result<()> {
    match action {
        ListAction::Create { board_id, title } => {
            ctx.open_board(board_id).await?;
            let list = ctx.controller.create_list(board_id, &title).await?;
            output::output_success(&list);
        }
        ListAction::Update { id, title } => {
            let patch = ListPatch {
                title: Some(title),
                position: None,
            };
            let list = ctx.controller.update_list(id, patch).await?;
            output::output_success(&list);
        }
        ListAction::Delete { id } => {
            ctx.open_board_of_list(id).await?;
            ctx.controller.delete_list(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        ListAction::Move { id, index } => {
            ctx.open_board_of_list(id).await?;
            ctx.controller.move_list(id, index).await?;
            output::output_success(ctx.current_board()?);
        }
    }
    Ok(())
}
