//! Altherma client: domain operations on top of the correlation engine.

use chrono::Utc;

use crate::domain::resource::{CONTENT_VALUE_PATH, DEVICE_MODEL_PATH};
use crate::domain::{DeviceInfo, Endpoint, NetworkInfo, PowerState, Resource, ResultCode};
use crate::error::AlthermaError;
use crate::json_path::FromJsonLeaf;
use crate::ws::messages::ContentInstance;
use crate::ws::{Connection, ConnectionState, Transport, WsTransport};

/// Lowest target temperature the adapter accepts, in °C.
pub const MIN_TARGET_TEMPERATURE: i32 = 16;
/// Highest target temperature the adapter accepts, in °C.
pub const MAX_TARGET_TEMPERATURE: i32 = 30;

/// Client for one Daikin Altherma LAN adapter.
///
/// Holds a single [`Connection`]. Operations take `&mut self` and run one
/// request at a time; share a client between tasks behind a
/// `tokio::sync::Mutex`.
///
/// # Read semantics
///
/// When the adapter answers a read with a non-success result code, the
/// read yields the zero value of its type (`0`, `""`, `None`) instead of
/// an error. Writes never fail on the result code; they return it.
#[derive(Debug)]
pub struct AlthermaClient<T = WsTransport> {
    connection: Connection<T>,
}

impl AlthermaClient<WsTransport> {
    /// Creates a disconnected client using the WebSocket transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Default for AlthermaClient<T> {
    fn default() -> Self {
        Self {
            connection: Connection::default(),
        }
    }
}

impl<T: Transport> AlthermaClient<T> {
    /// Creates a client around an already-open transport.
    #[must_use]
    pub const fn with_transport(transport: T) -> Self {
        Self {
            connection: Connection::from_transport(transport),
        }
    }

    /// Returns the connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Validates `hostname` and connects to `ws://<hostname>/mca`.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::InvalidHost`] without any I/O if
    /// `hostname` is not a valid host name or IP literal, or the
    /// transport's error if the handshake fails.
    pub async fn connect(&mut self, hostname: &str) -> Result<(), AlthermaError> {
        let endpoint = Endpoint::parse(hostname)?;
        self.connection.open(&endpoint).await
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the closing handshake fails.
    pub async fn close(&mut self) -> Result<(), AlthermaError> {
        self.connection.close().await
    }

    /// Reads the adapter model, temperatures, operating state, and unit
    /// status codes.
    ///
    /// # Errors
    ///
    /// Returns the first failing read's error, or
    /// [`AlthermaError::UnrecognizedPowerState`] if the power state is
    /// neither `on` nor `standby`.
    pub async fn get_device_info(&mut self) -> Result<DeviceInfo, AlthermaError> {
        let adapter_model = self
            .read::<String>(&Resource::DEVICE_INFO, DEVICE_MODEL_PATH)
            .await?;
        let indoor_temperature = self.read_content::<f32>(&Resource::INDOOR_TEMPERATURE).await?;
        let outdoor_temperature = self
            .read_content::<f32>(&Resource::OUTDOOR_TEMPERATURE)
            .await?;
        let leaving_water_temperature = self
            .read_content::<f32>(&Resource::LEAVING_WATER_TEMPERATURE)
            .await?;
        let target_temperature = self.get_target_temperature().await?;
        let power_state = self.get_power_state().await?;
        let emergency_state = self.read_content::<i32>(&Resource::EMERGENCY_STATE).await?;
        let error_state = self.read_content::<i32>(&Resource::ERROR_STATE).await?;
        let warning_state = self.read_content::<i32>(&Resource::WARNING_STATE).await?;

        Ok(DeviceInfo {
            adapter_model,
            indoor_temperature,
            outdoor_temperature,
            leaving_water_temperature,
            target_temperature,
            power_state,
            emergency_state,
            error_state,
            warning_state,
            retrieved_at: Utc::now(),
        })
    }

    /// Reads and validates the adapter's network settings.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::InvalidNetworkSettings`] naming the first
    /// missing or malformed field, or the read's error.
    pub async fn get_network_info(&mut self) -> Result<NetworkInfo, AlthermaError> {
        let document = self
            .read_content::<String>(&Resource::NETWORK_SETTINGS)
            .await?;
        Ok(NetworkInfo::from_settings_document(&document)?)
    }

    /// Reads the heating power state.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::UnrecognizedPowerState`] for any value
    /// other than `on` or `standby`, or the read's error.
    pub async fn get_power_state(&mut self) -> Result<PowerState, AlthermaError> {
        self.read_content::<String>(&Resource::POWER)
            .await?
            .parse()
    }

    /// Reads the target temperature. `None` outside temperature mode.
    ///
    /// # Errors
    ///
    /// Returns the read's error.
    pub async fn get_target_temperature(&mut self) -> Result<Option<f32>, AlthermaError> {
        self.read_content::<Option<f32>>(&Resource::TARGET_TEMPERATURE)
            .await
    }

    /// Sets the target temperature in °C.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::OutOfRange`] without contacting the
    /// adapter unless `16 <= value <= 30`, or the request's error.
    pub async fn set_target_temperature(&mut self, value: i32) -> Result<ResultCode, AlthermaError> {
        if !(MIN_TARGET_TEMPERATURE..=MAX_TARGET_TEMPERATURE).contains(&value) {
            return Err(AlthermaError::OutOfRange {
                value,
                min: MIN_TARGET_TEMPERATURE,
                max: MAX_TARGET_TEMPERATURE,
            });
        }
        self.write(
            &Resource::TARGET_TEMPERATURE_CONTAINER,
            ContentInstance::text(value),
        )
        .await
    }

    /// Switches heating on or to standby.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn set_heating(&mut self, state: PowerState) -> Result<ResultCode, AlthermaError> {
        self.write(&Resource::POWER_CONTAINER, ContentInstance::text(state.as_str()))
            .await
    }

    async fn read_content<V: FromJsonLeaf + Default>(
        &mut self,
        resource: &Resource,
    ) -> Result<V, AlthermaError> {
        self.read(resource, CONTENT_VALUE_PATH).await
    }

    async fn read<V: FromJsonLeaf + Default>(
        &mut self,
        resource: &Resource,
        path: &str,
    ) -> Result<V, AlthermaError> {
        let response = self.connection.call(resource, None).await?;
        if !response.result_code.is_success() {
            tracing::warn!(
                %resource,
                result_code = %response.result_code,
                "read not answered with a value"
            );
            return Ok(V::default());
        }
        response.value(path)
    }

    async fn write(
        &mut self,
        resource: &Resource,
        content: ContentInstance,
    ) -> Result<ResultCode, AlthermaError> {
        let response = self.connection.call(resource, Some(content)).await?;
        if !response.result_code.is_accepted_write() {
            tracing::warn!(
                %resource,
                result_code = %response.result_code,
                "write not accepted by adapter"
            );
        }
        Ok(response.result_code)
    }
}
