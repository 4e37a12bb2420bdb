use std::time::Duration;

use crate::cli::RemindersAction;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::NotificationFilter;

pub async fn handle(ctx: &CliContext, action: RemindersAction) -> anyhow::Result<()> {
    match action {
        RemindersAction::Check { board_id } => {
            ctx.open_board(board_id).await?;
            let fired = ctx.reminder_scheduler(None).check_now();
            output::output_list(fired);
        }
        RemindersAction::Watch { board_id, interval } => {
            ctx.open_board(board_id).await?;
            let scheduler =
                ctx.reminder_scheduler(interval.filter(|s| *s > 0).map(Duration::from_secs));
            scheduler.start();
            eprintln!(
                "Watching board {} for reminders every {:?}; press Ctrl-C to stop",
                board_id,
                scheduler.poll_interval()
            );

            tokio::signal::ctrl_c().await?;
            scheduler.stop();
            output::output_list(ctx.hub.visible(NotificationFilter::Reminders));
        }
    }
    Ok(())
}
