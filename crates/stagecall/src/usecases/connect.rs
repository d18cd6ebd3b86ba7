//! connect_ableton / disconnect_ableton / get_connection_status.

use serde::Deserialize;
use serde_json::json;

use liveosc::OscEndpoints;

use crate::usecases::{settle, UseCaseResult};
use crate::{ConnectionState, ErrorCode, Session, ToolOutcome};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectArgs {
    pub host: Option<String>,
    pub send_port: Option<u16>,
    pub receive_port: Option<u16>,
}

pub async fn connect(session: &Session, args: ConnectArgs) -> ToolOutcome {
    settle(run_connect(session, args).await)
}

async fn run_connect(session: &Session, args: ConnectArgs) -> UseCaseResult {
    let defaults = &session.config().osc;
    let endpoints = OscEndpoints {
        host: args.host.unwrap_or_else(|| defaults.host.clone()),
        send_port: args.send_port.unwrap_or(defaults.send_port),
        receive_port: args.receive_port.unwrap_or(defaults.receive_port),
    };

    if endpoints.host.trim().is_empty() {
        return Err(ToolOutcome::validation("host must not be empty"));
    }
    if endpoints.send_port == endpoints.receive_port {
        return Err(ToolOutcome::validation(format!(
            "send_port and receive_port must differ (both {})",
            endpoints.send_port
        )));
    }

    let send = endpoints.send_addr();
    let receive = endpoints.receive_addr();
    match session.connect(endpoints).await {
        Ok(()) => Ok(ToolOutcome::ok(
            format!("Connected to Ableton (sending to {send}, listening on {receive})"),
            json!({ "state": ConnectionState::Connected, "send": send, "receive": receive }),
        )),
        Err(err) => Err(ToolOutcome::fail(
            ErrorCode::ConnectionFailed,
            format!("Could not reach AbletonOSC at {send}: {err}"),
        )),
    }
}

pub async fn disconnect(session: &Session) -> ToolOutcome {
    session.disconnect().await;
    ToolOutcome::ok(
        "Disconnected from Ableton",
        json!({ "state": ConnectionState::Disconnected }),
    )
}

pub async fn status(session: &Session) -> ToolOutcome {
    let state = session.state().await;
    let endpoints = session.endpoints().await;
    let message = match (&state, &endpoints) {
        (ConnectionState::Connected, Some(e)) => {
            format!("Connected to Ableton at {}", e.send_addr())
        }
        _ => format!("Connection state: {state}"),
    };
    ToolOutcome::ok(
        message,
        json!({
            "state": state,
            "send": endpoints.as_ref().map(OscEndpoints::send_addr),
            "receive": endpoints.as_ref().map(OscEndpoints::receive_addr),
        }),
    )
}
