mod add;
mod auth;
mod graph;
mod info;
mod init;
mod list;
mod remove;
mod search;
mod shared;

use std::sync::Arc;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;

pub use add::cmd_add;
pub use auth::cmd_auth;
pub use graph::cmd_graph;
pub use info::cmd_info;
pub use init::cmd_init;
pub use list::cmd_list;
pub use remove::cmd_remove;
pub use search::cmd_search;
pub use shared::cmd_shared;

pub(crate) async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::new(&config.general.database_path).await
}

pub(crate) fn tmdb_client(config: &Config, store: &Store) -> anyhow::Result<Arc<TmdbClient>> {
    if !config.has_api_token() {
        anyhow::bail!("No TMDB API token configured. Run 'castgraph auth <token>' first.");
    }

    Ok(Arc::new(TmdbClient::new(
        config.tmdb.api_token.clone(),
        config.tmdb.language.clone(),
        store.cache_repo(),
    )))
}

pub(crate) fn parse_series_id(id_str: &str) -> Option<i64> {
    id_str.parse::<i64>().ok()
}
