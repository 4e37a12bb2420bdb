use crate::cli::{BoardAction, BoardUpdateArgs};
use crate::context::CliContext;
use crate::handlers::description_update;
use crate::output;
use taskboard_domain::BoardPatch;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Create { title, description } => {
            let board = ctx.controller.create_board(&title, description).await?;
            output::output_success(&board);
        }
        BoardAction::List => {
            let boards = ctx.controller.load_boards().await?;
            output::output_list(boards);
        }
        BoardAction::Get { id } => match ctx.controller.load_board(id).await? {
            Some(board) => output::output_success(&board),
            None => output::output_error(&format!("Board not found: {}", id)),
        },
        BoardAction::Update(args) => handle_update(ctx, args).await?,
        BoardAction::Delete { id } => {
            ctx.controller.delete_board(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
    }
    Ok(())
}

async fn handle_update(ctx: &CliContext, args: BoardUpdateArgs) -> anyhow::Result<()> {
    let patch = BoardPatch {
        title: args.title,
        description: description_update(args.description, args.clear_description),
    };
    let board = ctx.controller.update_board(args.id, patch).await?;
    output::output_success(&board);
    Ok(())
}
