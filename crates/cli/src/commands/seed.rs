//! Seed the data directory with the catalog fixture and default content.
//!
//! Refuses to overwrite existing data unless `--force` is passed, so a
//! stray invocation cannot wipe a production catalog.

use chrono::Utc;
use tracing::info;

use capsulehaus_server::seed;

use super::open_stores;

/// Seed the 30-model product catalog.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened, the catalog already
/// has products and `force` is not set, or persisting fails.
pub fn products(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stores = open_stores()?;

    let existing = stores.products.count()?;
    if existing > 0 && !force {
        return Err(format!(
            "Catalog already has {existing} products; pass --force to overwrite"
        )
        .into());
    }

    let catalog = seed::products(Utc::now());
    let count = catalog.len();
    stores.products.replace_all(catalog)?;

    info!(count, "Product catalog seeded");
    Ok(())
}

/// Seed the default page blocks and typed content.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened, pages already exist
/// and `force` is not set, or persisting fails.
pub fn content(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stores = open_stores()?;

    let existing = stores.content.slugs()?;
    if !existing.is_empty() && !force {
        return Err(format!(
            "Page content already exists ({}); pass --force to overwrite",
            existing.join(", ")
        )
        .into());
    }

    let now = Utc::now();
    let pages = seed::pages(now);
    let count = pages.len();
    for (slug, entry) in pages {
        stores.content.put_page(slug, entry)?;
        info!(slug, "Page seeded");
    }

    info!(count, "Page content seeded");
    Ok(())
}
