//! Environment loading, startup sequencing, and shutdown wiring.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use liftoff_api::{ApiServer, ApiState};
use liftoff_store::{MongoConnector, MongoStore, StoreSettings};
use liftoff_telemetry::LoggingConfig;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

const ENV_MONGODB_URI: &str = "MONGODB_URI";
const ENV_DATABASE: &str = "LIFTOFF_DB";
const ENV_PORT: &str = "PORT";
const ENV_BIND_ADDR: &str = "LIFTOFF_BIND_ADDR";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Dependencies required to bootstrap the liftoff service.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    settings: StoreSettings,
    addr: SocketAddr,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary
    /// entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::default();

        let uri = std::env::var(ENV_MONGODB_URI).map_err(|_| AppError::MissingEnv {
            name: ENV_MONGODB_URI,
        })?;
        let mut settings = StoreSettings::new(uri);
        if let Ok(database) = std::env::var(ENV_DATABASE) {
            settings = settings.with_database(database);
        }

        let port = parse_port(std::env::var(ENV_PORT).ok().as_deref())?;
        let bind_addr = parse_bind_addr(std::env::var(ENV_BIND_ADDR).ok().as_deref())?;

        Ok(Self {
            logging,
            settings,
            addr: SocketAddr::new(bind_addr, port),
        })
    }
}

/// Entry point for the liftoff boot sequence.
///
/// # Errors
///
/// Returns an error if environment loading, the initial database connect, or
/// serving fails. The initial connect is fatal: the process exits non-zero
/// rather than serving guaranteed failures.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify
/// testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    liftoff_telemetry::init_logging(&dependencies.logging)
        .map_err(|source| AppError::telemetry("telemetry.init", source))?;

    info!("liftoff bootstrap starting");

    let BootstrapDependencies {
        logging: _,
        settings,
        addr,
    } = dependencies;

    let store = MongoStore::connect(&settings)
        .await
        .map_err(|source| AppError::store("store.connect", source))?;
    let connector = Arc::new(MongoConnector::new(settings));
    let state = Arc::new(ApiState::with_store(connector, Arc::new(store)));
    let api = ApiServer::new(Arc::clone(&state));

    info!(addr = %addr, "launching api listener");
    let serve_result = api.serve(addr, shutdown_signal()).await;

    state.close_store().await;
    info!("store closed; shutdown complete");

    serve_result.map_err(|source| AppError::api_server("api_server.serve", source))?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM; drives the listener's graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c; shutting down"),
        () = terminate => info!("received sigterm; shutting down"),
    }
}

fn parse_port(value: Option<&str>) -> AppResult<u16> {
    let Some(raw) = value else {
        return Ok(DEFAULT_PORT);
    };
    let port: u16 = raw.trim().parse().map_err(|_| AppError::InvalidConfig {
        field: "PORT",
        reason: "not_a_number",
        value: Some(raw.to_string()),
    })?;
    if port == 0 {
        return Err(AppError::InvalidConfig {
            field: "PORT",
            reason: "zero",
            value: Some(raw.to_string()),
        });
    }
    Ok(port)
}

fn parse_bind_addr(value: Option<&str>) -> AppResult<IpAddr> {
    let Some(raw) = value else {
        return Ok(DEFAULT_BIND_ADDR);
    };
    raw.trim().parse().map_err(|_| AppError::InvalidConfig {
        field: "LIFTOFF_BIND_ADDR",
        reason: "not_an_ip_address",
        value: Some(raw.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_unset() -> AppResult<()> {
        assert_eq!(parse_port(None)?, DEFAULT_PORT);
        assert_eq!(parse_port(Some("8080"))?, 8080);
        assert_eq!(parse_port(Some(" 3001 "))?, 3001);
        Ok(())
    }

    #[test]
    fn port_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_port(Some("0")),
            Err(AppError::InvalidConfig {
                field: "PORT",
                reason: "zero",
                ..
            })
        ));
        assert!(matches!(
            parse_port(Some("not-a-port")),
            Err(AppError::InvalidConfig {
                field: "PORT",
                reason: "not_a_number",
                ..
            })
        ));
        assert!(matches!(
            parse_port(Some("70000")),
            Err(AppError::InvalidConfig {
                field: "PORT",
                reason: "not_a_number",
                ..
            })
        ));
    }

    #[test]
    fn bind_addr_defaults_to_all_interfaces() -> AppResult<()> {
        assert_eq!(parse_bind_addr(None)?, DEFAULT_BIND_ADDR);
        assert_eq!(
            parse_bind_addr(Some("127.0.0.1"))?,
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
        Ok(())
    }

    #[test]
    fn bind_addr_rejects_hostnames() {
        assert!(matches!(
            parse_bind_addr(Some("localhost")),
            Err(AppError::InvalidConfig {
                field: "LIFTOFF_BIND_ADDR",
                reason: "not_an_ip_address",
                ..
            })
        ));
    }
}
