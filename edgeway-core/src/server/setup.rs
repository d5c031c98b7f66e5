use crate::cache::MemoryCache;
use crate::conf::EdgewayConfig;
use crate::dispatch::{DispatcherSettings, ProxyDispatcher};
use crate::proxy::EdgeGateway;
use crate::server::pid;
use crate::store::ObjectStore;
use anyhow::{Context, Result};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;
use std::sync::Arc;

/// Run the Pingora server with the given configuration. Blocks forever.
pub fn run(config: EdgewayConfig) -> Result<()> {
    if let Some(pid_file) = &config.server.pid_file {
        match pid::write_pid(pid_file) {
            Ok(()) => tracing::info!(pid_file = %pid_file.display(), "pid file written"),
            Err(e) => {
                tracing::warn!(error = %e, pid_file = %pid_file.display(), "failed to write pid file; continuing")
            }
        }
    }

    let server = build_pingora_server(&config)?;

    if let Some(pid_file) = config.server.pid_file.clone() {
        ctrlc::set_handler(move || {
            tracing::info!("shutdown requested, removing pid file");
            pid::remove_pid(&pid_file);
            std::process::exit(0);
        })?;
    }

    tracing::info!(
        listen = %config.server.listen,
        bucket = %config.bucket.root.display(),
        redirect = config.delivery.external_domain.is_some(),
        "edgeway listening"
    );

    server.run_forever();
}

/// Build the Pingora server with a single public listener.
pub fn build_pingora_server(config: &EdgewayConfig) -> Result<Server> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(threads, "Creating Pingora server with overridden worker threads");
        let mut conf = ServerConf::new().context("could not construct pingora server configuration")?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let dispatcher = build_dispatcher(config)?;
    let gateway = EdgeGateway::new(Arc::new(dispatcher), config.server.scheme());

    let mut svc = http_proxy_service(&server.configuration, gateway);
    if let Some(tls) = &config.server.tls {
        svc.add_tls(&config.server.listen, &tls.cert, &tls.key)?;
    } else {
        svc.add_tcp(&config.server.listen);
    }

    server.add_service(svc);

    Ok(server)
}

/// Wire the bucket and an in-process cache into a dispatcher.
pub fn build_dispatcher(config: &EdgewayConfig) -> Result<ProxyDispatcher> {
    let settings = DispatcherSettings::from(&config.delivery);
    let store = open_bucket(config)?;
    let cache = Arc::new(MemoryCache::new());

    Ok(ProxyDispatcher::new(settings, store, cache))
}

#[cfg(feature = "fs_bucket")]
fn open_bucket(config: &EdgewayConfig) -> Result<Arc<dyn ObjectStore>> {
    let root = &config.bucket.root;
    anyhow::ensure!(root.is_dir(), "bucket root is not a directory: {}", root.display());

    Ok(Arc::new(crate::store::FsStore::new(root.clone())))
}

#[cfg(not(feature = "fs_bucket"))]
fn open_bucket(_config: &EdgewayConfig) -> Result<Arc<dyn ObjectStore>> {
    anyhow::bail!("filesystem bucket support disabled (enable the `fs_bucket` feature)")
}
