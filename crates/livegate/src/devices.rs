//! Devices and device parameters.

use live_model::{check_track_index, Device, DeviceParameter};
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

/// Flat wire fields per parameter in a `/device/get/parameters` reply:
/// name(s) value(f) min(f) max(f).
const PARAM_RECORD: usize = 4;

fn check_device(track_id: i32, device_id: i32) -> Result<(), GatewayError> {
    check_track_index("track_id", track_id, false)?;
    check_track_index("device_id", device_id, false)?;
    Ok(())
}

fn device_args(track_id: i32, device_id: i32) -> Vec<OscArg> {
    vec![OscArg::Int(track_id), OscArg::Int(device_id)]
}

fn param_args(track_id: i32, device_id: i32, index: i32) -> Vec<OscArg> {
    vec![OscArg::Int(track_id), OscArg::Int(device_id), OscArg::Int(index)]
}

impl LiveGateway {
    pub async fn get_device_name(
        &self,
        track_id: i32,
        device_id: i32,
    ) -> Result<String, GatewayError> {
        check_device(track_id, device_id)?;
        let args = self.query("/device/get/name", &device_args(track_id, device_id)).await?;
        reply::string(&args, 2, "/device/get/name")
    }

    pub async fn get_device_class_name(
        &self,
        track_id: i32,
        device_id: i32,
    ) -> Result<String, GatewayError> {
        check_device(track_id, device_id)?;
        let args = self.query("/device/get/class_name", &device_args(track_id, device_id)).await?;
        reply::string(&args, 2, "/device/get/class_name")
    }

    pub async fn get_device_is_enabled(
        &self,
        track_id: i32,
        device_id: i32,
    ) -> Result<bool, GatewayError> {
        check_device(track_id, device_id)?;
        let args = self.query("/device/get/is_enabled", &device_args(track_id, device_id)).await?;
        reply::boolean(&args, 2, "/device/get/is_enabled")
    }

    pub async fn set_device_is_enabled(
        &self,
        track_id: i32,
        device_id: i32,
        enabled: bool,
    ) -> Result<(), GatewayError> {
        check_device(track_id, device_id)?;
        self.command(
            "/device/set/is_enabled",
            &[OscArg::Int(track_id), OscArg::Int(device_id), OscArg::Int(enabled as i32)],
        )
        .await
    }

    /// All parameters in one flat reply: (name, value, min, max) per
    /// parameter, after the echoed track/device indices.
    pub async fn get_device_parameters(
        &self,
        track_id: i32,
        device_id: i32,
    ) -> Result<Vec<DeviceParameter>, GatewayError> {
        check_device(track_id, device_id)?;
        let args = self.query("/device/get/parameters", &device_args(track_id, device_id)).await?;

        let records = reply::tail(&args, 2, PARAM_RECORD);
        if records.len() % PARAM_RECORD != 0 {
            return Err(GatewayError::Protocol(format!(
                "/device/get/parameters: reply length {} is not a whole number of parameters",
                records.len()
            )));
        }

        let mut parameters = Vec::with_capacity(records.len() / PARAM_RECORD);
        for (index, record) in records.chunks_exact(PARAM_RECORD).enumerate() {
            let bad = || {
                GatewayError::Protocol(format!(
                    "/device/get/parameters: bad parameter record {record:?}"
                ))
            };
            parameters.push(DeviceParameter {
                index: index as i32,
                name: Some(record[0].as_str().ok_or_else(bad)?.to_string()),
                value: record[1].as_float().ok_or_else(bad)?,
                min: record[2].as_float(),
                max: record[3].as_float(),
                display_value: None,
            });
        }
        Ok(parameters)
    }

    pub async fn get_parameter_value(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
    ) -> Result<f32, GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        let args = self.query("/device/get/parameter", &param_args(track_id, device_id, index)).await?;
        reply::float(&args, 3, "/device/get/parameter")
    }

    /// Set one parameter. The raw value is passed through: parameter
    /// ranges are device-specific, so the only local check is the index.
    pub async fn set_parameter_value(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
        value: f32,
    ) -> Result<(), GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        if !value.is_finite() {
            return Err(GatewayError::Validation(format!("parameter value {value} is not finite")));
        }
        self.command(
            "/device/set/parameter",
            &[
                OscArg::Int(track_id),
                OscArg::Int(device_id),
                OscArg::Int(index),
                OscArg::Float(value),
            ],
        )
        .await
    }

    pub async fn get_parameter_name(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
    ) -> Result<String, GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        let args = self
            .query("/device/get/parameter_name", &param_args(track_id, device_id, index))
            .await?;
        reply::string(&args, 3, "/device/get/parameter_name")
    }

    pub async fn get_parameter_display(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
    ) -> Result<String, GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        let args = self
            .query("/device/get/parameter_display", &param_args(track_id, device_id, index))
            .await?;
        reply::string(&args, 3, "/device/get/parameter_display")
    }

    pub async fn get_parameter_min(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
    ) -> Result<f32, GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        let args = self
            .query("/device/get/parameter_min", &param_args(track_id, device_id, index))
            .await?;
        reply::float(&args, 3, "/device/get/parameter_min")
    }

    pub async fn get_parameter_max(
        &self,
        track_id: i32,
        device_id: i32,
        index: i32,
    ) -> Result<f32, GatewayError> {
        check_device(track_id, device_id)?;
        check_track_index("param_index", index, false)?;
        let args = self
            .query("/device/get/parameter_max", &param_args(track_id, device_id, index))
            .await?;
        reply::float(&args, 3, "/device/get/parameter_max")
    }

    /// Device snapshot composite. The name is the root query; enablement
    /// and the parameter list degrade individually.
    pub async fn device_info(&self, track_id: i32, device_id: i32) -> Result<Device, GatewayError> {
        check_device(track_id, device_id)?;
        let (name, class_name, is_enabled, parameters) = tokio::join!(
            self.get_device_name(track_id, device_id),
            self.get_device_class_name(track_id, device_id),
            self.get_device_is_enabled(track_id, device_id),
            self.get_device_parameters(track_id, device_id),
        );
        let name = name?;
        Ok(Device {
            track_id,
            device_id,
            name: Some(name),
            class_name: class_name.ok(),
            is_enabled: is_enabled.ok(),
            parameters: parameters.unwrap_or_default(),
        })
    }
}
