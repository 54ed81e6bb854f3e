//! Order ledger statistics.

use tracing::info;

use super::open_stores;

/// Print revenue and order count.
///
/// Revenue excludes cancelled orders while the count includes them - the
/// same asymmetry the back-office dashboard shows.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened.
pub fn orders() -> Result<(), Box<dyn std::error::Error>> {
    let stores = open_stores()?;
    let stats = stores.orders.stats()?;

    info!(
        revenue = %stats.revenue,
        count = stats.count,
        "Order ledger statistics"
    );
    Ok(())
}
