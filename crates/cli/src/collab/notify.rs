use serde::Serialize;

use shelfcast_inventory::LowStockNotice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub delivered: bool,
    pub message: String,
}

/// Delivers low-stock notices (mail, chat, ...).
pub trait Notifier {
    fn notify(&self, notice: &LowStockNotice) -> NotificationOutcome;
}

/// Subject and body of a low-stock message.
pub fn compose(notice: &LowStockNotice) -> (String, String) {
    let subject = format!("Low stock alert: {}", notice.product);
    let body = format!(
        "Stock of {} is {} units, reorder point is {:.0} units \
         (average daily demand {:.1}). Please reorder.",
        notice.product, notice.current_stock, notice.reorder_point, notice.avg_daily_demand
    );
    (subject, body)
}

/// Emits notices to the log instead of a mail transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &LowStockNotice) -> NotificationOutcome {
        let (subject, body) = compose(notice);
        tracing::warn!(
            product = %notice.product,
            current_stock = notice.current_stock,
            reorder_point = notice.reorder_point,
            avg_daily_demand = notice.avg_daily_demand,
            subject = %subject,
            "{body}"
        );
        NotificationOutcome {
            delivered: true,
            message: format!("logged: {subject}"),
        }
    }
}
