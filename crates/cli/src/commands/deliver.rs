//! Commands that hand engine output to an outside collaborator.

use chrono::NaiveDate;
use serde::Serialize;

use shelfcast_core::ProductId;

use crate::collab::{ExportSink, Notifier};
use crate::commands::CommandResult;
use crate::session::Session;

pub fn export(session: &Session, sink: &impl ExportSink, today: NaiveDate) -> CommandResult {
    let tables = match session.export_tables(today) {
        Ok(tables) => tables,
        Err(e) => return CommandResult::domain_failure("export", &e),
    };

    let outcome = sink.export(&tables);
    if outcome.success {
        CommandResult::success("export", outcome.message.clone(), outcome)
    } else {
        CommandResult::failure("export", "export", outcome.message, 1)
    }
}

#[derive(Debug, Serialize)]
struct Delivery {
    product: ProductId,
    delivered: bool,
    message: String,
}

pub fn notify(session: &Session, notifier: &impl Notifier) -> CommandResult {
    let notices = match session.low_stock_notices() {
        Ok(notices) => notices,
        Err(e) => return CommandResult::domain_failure("notify", &e),
    };

    let deliveries: Vec<Delivery> = notices
        .iter()
        .map(|notice| {
            let outcome = notifier.notify(notice);
            Delivery {
                product: notice.product.clone(),
                delivered: outcome.delivered,
                message: outcome.message,
            }
        })
        .collect();

    let failed = deliveries.iter().filter(|d| !d.delivered).count();
    CommandResult::success(
        "notify",
        format!("{} low-stock notice(s), {failed} failed", deliveries.len()),
        deliveries,
    )
}
