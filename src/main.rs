use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::signal;
use tracing::{error, info, warn, Level};

use fleet_registry::config::database::DatabaseConfig;
use fleet_registry::config::environment::{EnvironmentConfig, StorageKind};
use fleet_registry::create_app;
use fleet_registry::database::{connection, seeder};
use fleet_registry::state::{AppState, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Fleet Registry - Vehicle Service");
    info!("===================================");
    info!("🌍 Entorno: {}", config.environment);
    if config.is_development() && config.allows_any_origin() {
        warn!("⚠️ CORS abierto a cualquier origen (modo desarrollo)");
    }

    let storage = match config.storage {
        StorageKind::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match connection::connect(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            connection::run_migrations(&pool)
                .await
                .context("Error aplicando migraciones")?;
            StorageBackend::Postgres(pool)
        }
        StorageKind::Memory => {
            warn!("⚠️ STORAGE_BACKEND=memory: los datos se pierden al reiniciar");
            StorageBackend::Memory(Default::default())
        }
    };

    let app_state = AppState::new(storage, config.clone());

    if config.seed_database {
        let mut store = app_state.vehicle_store();
        seeder::seed_if_empty(store.as_mut())
            .await
            .context("Error insertando datos de ejemplo")?;
    }

    let app = create_app(app_state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección de servidor inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🚗 Vehículos:");
    info!("   GET|POST /api/vehicles");
    info!("   GET|PUT|DELETE /api/vehicles/:id");
    info!("   GET  /api/vehicles/statistics | fuel | low-fuel | :id/status-history");
    info!("   POST /api/vehicles/batch/update-status | update-fuel | schedule-maintenance | delete");
    info!("📊 Reportes:");
    info!("   GET  /api/reports/fleet-performance | fuel-consumption | maintenance-summary | summary");
    info!("   POST /api/reports/generate");
    info!("   GET  /api/reports/recent | :id | :id/download");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
