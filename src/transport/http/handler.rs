//! Request routing

use std::sync::Arc;

use tracing::debug;
use trait_variant::make;

use crate::{
    backend::{IndicatorDriver, RadioDriver, SensorDriver},
    core::{clock::Clock, sensor::SensorGateway},
    protocol::CommandInterpreter,
    transport::http::{
        message::{
            APPLICATION_JSON, HttpRequest, HttpResponse, StatusCode, TEXT_HTML, TEXT_JSON,
            TEXT_PLAIN,
        },
        pages::{TELEMETRY_PAGE, welcome_page},
    },
};

const COMMAND_PREFIX: &str = "/cmd/wifi";
const HELP_PATH: &str = "/cmd=help";
const SENSOR_PATH: &str = "/dht11";
const TELEMETRY_PATH: &str = "/telemetry";

pub const SENSOR_FAILURE_BODY: &str = "Failed to retrieve data from sensor.";

/// Turns one parsed request into one response
///
/// The connection server only talks to this trait, so the scheduling of
/// connections can change without touching routing or command handling.
#[make(Send)]
pub trait RequestHandler: Send + Sync + 'static {
    async fn handle(&self, request: HttpRequest) -> HttpResponse;
}

/// Maps request paths to pages, commands and telemetry
pub struct Router<R, I, C, S>
where
    R: RadioDriver,
    I: IndicatorDriver,
    C: Clock,
    S: SensorDriver,
{
    device_name: String,
    interpreter: CommandInterpreter<R, I, C>,
    sensor: Arc<SensorGateway<S>>,
}

impl<R, I, C, S> Router<R, I, C, S>
where
    R: RadioDriver,
    I: IndicatorDriver,
    C: Clock,
    S: SensorDriver,
{
    pub fn new(
        device_name: String,
        interpreter: CommandInterpreter<R, I, C>,
        sensor: Arc<SensorGateway<S>>,
    ) -> Self {
        Self {
            device_name,
            interpreter,
            sensor,
        }
    }

    async fn command(&self, query: Option<&str>) -> HttpResponse {
        let query = query.unwrap_or_default();
        debug!(query, "Command request");
        let output = self.interpreter.execute(&format!("wifi {}", query)).await;
        HttpResponse::ok(TEXT_JSON, output)
    }

    async fn telemetry(&self) -> HttpResponse {
        let reading = match self.sensor.read_environment().await {
            Some(reading) => reading,
            None => {
                return HttpResponse::new(
                    StatusCode::InternalServerError,
                    TEXT_PLAIN,
                    SENSOR_FAILURE_BODY,
                );
            }
        };

        match serde_json::to_string(&reading) {
            Ok(body) => HttpResponse::ok(APPLICATION_JSON, body),
            Err(e) => HttpResponse::new(
                StatusCode::InternalServerError,
                TEXT_PLAIN,
                format!("{} {}", SENSOR_FAILURE_BODY, e),
            ),
        }
    }
}

impl<R, I, C, S> RequestHandler for Router<R, I, C, S>
where
    R: RadioDriver,
    I: IndicatorDriver,
    C: Clock,
    S: SensorDriver,
{
    async fn handle(&self, request: HttpRequest) -> HttpResponse {
        if request.method != "GET" {
            debug!(method = %request.method, "Unsupported method");
            return HttpResponse::not_found();
        }

        match request.path.as_str() {
            "/" => HttpResponse::ok(TEXT_HTML, welcome_page(&self.device_name)),
            SENSOR_PATH => self.telemetry().await,
            TELEMETRY_PATH => HttpResponse::ok(TEXT_HTML, TELEMETRY_PAGE),
            HELP_PATH => HttpResponse::ok(TEXT_PLAIN, self.interpreter.interpret("help").await),
            path if path.starts_with(COMMAND_PREFIX) => {
                self.command(request.query.as_deref()).await
            }
            path => {
                debug!(path, "No route");
                HttpResponse::not_found()
            }
        }
    }
}
