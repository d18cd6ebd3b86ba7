//! device_operations: device state and parameter access.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{ErrorCode, Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceAction {
    GetInfo,
    ToggleActive,
    GetParam,
    SetParam,
    GetParamName,
    GetParamDisplay,
    GetParamMin,
    GetParamMax,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceArgs {
    pub action: DeviceAction,
    pub track_id: i32,
    pub device_id: i32,
    pub param_index: Option<i32>,
    pub value: Option<f64>,
}

pub async fn execute(session: &Session, args: DeviceArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

fn require_param_index(args: &DeviceArgs) -> Result<i32, ToolOutcome> {
    args.param_index
        .ok_or_else(|| ToolOutcome::validation("this action requires param_index"))
}

async fn run(session: &Session, args: DeviceArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;
    let (track_id, device_id) = (args.track_id, args.device_id);

    // Range-check the device id up front so a missing device is a
    // DEVICE_NOT_FOUND, not a timeout.
    let device_count = gateway.get_num_devices(track_id).await?;
    if device_id < 0 || device_id >= device_count {
        return Err(ToolOutcome::fail(
            ErrorCode::DeviceNotFound,
            format!("device {device_id} does not exist on track {track_id} ({device_count} devices)"),
        ));
    }

    match args.action {
        DeviceAction::GetInfo => {
            let device = gateway.device_info(track_id, device_id).await?;
            let name = device.name.clone().unwrap_or_default();
            Ok(ToolOutcome::ok(
                format!("Device {device_id} on track {track_id}: {name} ({} parameters)", device.parameters.len()),
                json!({ "device": device }),
            ))
        }
        DeviceAction::ToggleActive => {
            let enabled = gateway.get_device_is_enabled(track_id, device_id).await?;
            gateway.set_device_is_enabled(track_id, device_id, !enabled).await?;
            Ok(ToolOutcome::ok(
                format!(
                    "Device {device_id} on track {track_id} {}",
                    if enabled { "deactivated" } else { "activated" }
                ),
                json!({ "is_enabled": !enabled }),
            ))
        }
        DeviceAction::GetParam => {
            let index = require_param_index(&args)?;
            let value = gateway.get_parameter_value(track_id, device_id, index).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} is {value}"),
                json!({ "param_index": index, "value": value }),
            ))
        }
        DeviceAction::SetParam => {
            let index = require_param_index(&args)?;
            let value = args
                .value
                .ok_or_else(|| ToolOutcome::validation("set_param requires a value"))?;
            gateway.set_parameter_value(track_id, device_id, index, value as f32).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} set to {value}"),
                json!({ "param_index": index, "value": value }),
            ))
        }
        DeviceAction::GetParamName => {
            let index = require_param_index(&args)?;
            let name = gateway.get_parameter_name(track_id, device_id, index).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} is named {name:?}"),
                json!({ "param_index": index, "name": name }),
            ))
        }
        DeviceAction::GetParamDisplay => {
            let index = require_param_index(&args)?;
            let display = gateway.get_parameter_display(track_id, device_id, index).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} reads {display:?}"),
                json!({ "param_index": index, "display_value": display }),
            ))
        }
        DeviceAction::GetParamMin => {
            let index = require_param_index(&args)?;
            let min = gateway.get_parameter_min(track_id, device_id, index).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} minimum is {min}"),
                json!({ "param_index": index, "min": min }),
            ))
        }
        DeviceAction::GetParamMax => {
            let index = require_param_index(&args)?;
            let max = gateway.get_parameter_max(track_id, device_id, index).await?;
            Ok(ToolOutcome::ok(
                format!("Parameter {index} maximum is {max}"),
                json!({ "param_index": index, "max": max }),
            ))
        }
    }
}
