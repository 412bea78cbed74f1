//! HTTP server command handler.

use std::sync::Arc;
use tabula::{TabulaConfig, build_orchestrator, serve};
use tabula_error::ConfigError;

/// Serve `POST /execute_sql` until Ctrl-C.
pub async fn run_server(config: &TabulaConfig, bind: Option<String>) -> anyhow::Result<()> {
    let addr = match bind {
        Some(bind) => bind
            .parse()
            .map_err(|e| ConfigError::for_setting("--bind", format!("invalid address '{}': {}", bind, e)))?,
        None => config.bind_addr()?,
    };

    let orchestrator = Arc::new(build_orchestrator(config)?);
    serve(orchestrator, addr).await?;
    Ok(())
}
