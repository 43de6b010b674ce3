// Search command for finding plugins by partial name

use crate::commands::Context;
use crate::sources::search::rank_search_results;
use crate::ui;
use log::info;

/// Fetch a full page so ranking sees more than the catalog's own top hits
const SEARCH_PAGE: usize = 100;
const COLUMN_WIDTH: usize = 20;

pub async fn search(ctx: &Context, query: &[String]) -> anyhow::Result<()> {
    let query = query.join(" ");
    ui::action(&format!("Searching for `{}`", query));

    let spinner = ui::spinner("Querying catalog...");
    let hits = ctx.plugins().search(&query, SEARCH_PAGE).await;
    ui::clear_bar(&spinner);
    let mut hits = hits?;

    if hits.is_empty() {
        ui::warning(&format!("No plugins found for `{}`", query));
        return Ok(());
    }

    rank_search_results(&mut hits, &query);
    let shown = ctx.settings.listing.apply(&hits);
    info!("Showing {} of {} result(s)", shown.len(), hits.len());

    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|hit| {
            vec![
                hit.slug.clone(),
                hit.title.clone(),
                hit.description.clone(),
            ]
        })
        .collect();
    ui::table(&["Unique identifier", "Name", "Description"], &rows, COLUMN_WIDTH);
    Ok(())
}
