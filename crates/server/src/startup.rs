use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth::AppState};
use service::auth::{
    password::PasswordScheme,
    repo::{json::JsonCredentialStore, seaorm::SeaOrmCredentialStore},
    repository::{memory::MemoryCredentialStore, CredentialStore},
    service::{AuthConfig, AuthService},
};

/// Any origin may call the auth endpoints.
pub fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Open the configured credential store. Database stores are migrated first.
pub async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match cfg.storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory credential store; records are lost on restart");
            Arc::new(MemoryCredentialStore::new())
        }
        StorageBackend::Json => {
            let store = JsonCredentialStore::open(&cfg.storage.json_path)
                .await
                .with_context(|| format!("opening {}", cfg.storage.json_path))?;
            info!(path = %cfg.storage.json_path, "using json credential store");
            Arc::new(store)
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None).await.context("running migrations")?;
            info!("using database credential store");
            Arc::new(SeaOrmCredentialStore::new(db))
        }
    };
    Ok(store)
}

pub fn build_state(store: Arc<dyn CredentialStore>, cfg: &AppConfig) -> AppState {
    let auth_cfg = AuthConfig { password_scheme: PasswordScheme::from(cfg.auth.password_scheme) };
    AppState::new(AuthService::new(store, auth_cfg))
}

/// Build the app from config: store, service, router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = build_store(cfg).await?;
    let state = build_state(store, cfg);
    Ok(routes::build_router(state, build_cors()))
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse().with_context(|| format!("invalid bind address {raw}"))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, scheme = PasswordScheme::from(cfg.auth.password_scheme).name(), "auth server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("auth server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9090;
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "0.0.0.0:9090");
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }

    #[tokio::test]
    async fn database_backend_migrates_sqlite() -> anyhow::Result<()> {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Database;
        cfg.database.url = "sqlite::memory:".into();
        let store = build_store(&cfg).await?;
        assert!(store.find_by_username("nobody").await?.is_none());
        Ok(())
    }
}
