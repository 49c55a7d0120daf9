use std::sync::Arc;

use tracing::info;

use stacks_core::policy::AccessPolicy;
use stacks_core::store::{BlogStore, CatalogStore, UserDirectory};

use crate::services::{accounts, SessionService};
use crate::settings::config::Settings;
use crate::stop_flag;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub catalog: CatalogStore,
    pub blog: BlogStore,
    pub users: UserDirectory,
    pub sessions: SessionService,
    pub policy: AccessPolicy,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;

        let stop_flag = stop_flag::StopFlag::new();
        stop_flag::register_signal_handler(&stop_flag);

        Self::from_settings(settings, stop_flag).await
    }

    /// Builds the state from ready-made settings; used by tests and the
    /// `config` subcommand.
    pub async fn from_settings(
        settings: Settings,
        stop_flag: stop_flag::StopFlag,
    ) -> anyhow::Result<SharedAppState> {
        let policy = AccessPolicy::new(settings.api.public_catalog_reads);
        let users = UserDirectory::new();

        accounts::bootstrap_admin(&users, &settings).await?;
        info!(
            "Access policy initialized (public catalog reads: {})",
            settings.api.public_catalog_reads
        );

        Ok(Arc::new(AppState {
            settings,
            stop_flag,
            catalog: CatalogStore::new(),
            blog: BlogStore::new(),
            users,
            sessions: SessionService::new(),
            policy,
        }))
    }

    pub async fn new_for_config_only() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        Self::from_settings(settings, stop_flag::StopFlag::new()).await
    }
}
