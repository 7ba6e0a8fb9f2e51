//! NetMaster - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use listenfd::ListenFd;
use netmaster::{
    backend::{LogIndicator, MockRadioDriver, MockSensor, RadioDriver, WpaRadioDriver},
    config::{BootNetwork, CliArgs, RadioBackend, Settings},
    core::{
        clock::TokioClock,
        service::DeviceService,
        types::{IndicatorPattern, RadioStatus},
    },
    protocol::CommandInterpreter,
    transport::http::{HttpServer, Router},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,netmaster=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from(CliArgs::parse());
    info!(?settings, "Starting NetMaster");

    if let BootNetwork::Station { credentials } = &settings.boot_network {
        if credentials.ssid.is_empty() {
            error!("Station mode requires --ssid");
            return Err("SSID not provided".into());
        }
    }

    match settings.radio_backend {
        RadioBackend::Simulated => {
            info!("Using simulated radio");
            run(Arc::new(MockRadioDriver::new()), settings).await
        }
        RadioBackend::Wpa => {
            if matches!(settings.boot_network, BootNetwork::AccessPoint { .. }) {
                error!("The wpa radio cannot host an access point, use --mode station");
                return Err("Access point unsupported by radio".into());
            }
            let radio = WpaRadioDriver::new(settings.interface.clone()).await?;
            info!("WiFi radio initialized for interface: {}", settings.interface);
            run(Arc::new(radio), settings).await
        }
    }
}

async fn run<R: RadioDriver>(
    radio: Arc<R>,
    settings: Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    warn!("No sensor driver for this host, /dht11 serves simulated readings");
    let service = DeviceService::new(
        radio,
        Arc::new(LogIndicator),
        Arc::new(TokioClock),
        Arc::new(MockSensor::new()),
        settings.radio_timing,
    );

    // Indicator stays on until the network and server are up
    service.indicate(IndicatorPattern::On).await;

    let status = match &settings.boot_network {
        BootNetwork::AccessPoint {
            credentials,
            ip_config,
        } => {
            info!("Starting access point '{}'", credentials.ssid);
            service.advertise(credentials, *ip_config).await?
        }
        BootNetwork::Station { credentials } => {
            info!("Joining network '{}'", credentials.ssid);
            service.join(credentials).await?
        }
    };

    match &status {
        RadioStatus::ApActive(config) => info!("Access point active at {}", config.ip),
        RadioStatus::Connected(config) => info!("Connected with address {}", config.ip),
        other => info!(?other, "Network not available, serving anyway"),
    }

    let router = Arc::new(Router::new(
        settings.device_name.clone(),
        CommandInterpreter::new(service.radio.clone()),
        service.sensor.clone(),
    ));

    let server = match ListenFd::from_env().take_tcp_listener(0)? {
        Some(listener) => {
            info!("Using socket-activated listener");
            listener.set_nonblocking(true)?;
            HttpServer::from_listener(
                TcpListener::from_std(listener)?,
                router,
                settings.read_timeout,
            )
        }
        None => HttpServer::bind(settings.listen_addr, router, settings.read_timeout).await?,
    };

    let task = tokio::spawn(server.run());

    info!(
        device = %settings.device_name,
        ssid = ?service.radio.ssid().await,
        "Service started successfully"
    );
    service.indicate(IndicatorPattern::Off).await;

    #[cfg(feature = "systemd")]
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        error!("Failed to notify systemd: {}", e);
    }

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        _ = shutdown_signal() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        result = task => {
            if let Err(e) = result {
                error!("HTTP server task failed: {}", e);
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    // On non-Unix platforms, just wait forever
    std::future::pending::<()>().await
}
