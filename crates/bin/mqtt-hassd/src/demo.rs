//! Demo device: one entity of each kind, with handlers that echo commands
//! back as state.

use std::sync::Arc;
use std::time::Instant;

use mqtt_hass_app::entity::{
    BinarySensor, Button, Cover, Lock, Sensor, SensorBuilder, command_handler,
};
use mqtt_hass_app::ports::Transport;
use mqtt_hass_app::{CommandHandler, Entity, Hass};
use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::{
    BinarySensorClass, BinarySensorState, ButtonClass, CoverClass, CoverState, EntityCategory,
    LockState, SensorClass,
};
use tokio::sync::mpsc;

/// A command received from the hub, forwarded out of the synchronous handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Restart,
    Lock(Vec<u8>),
    Cover(Vec<u8>),
}

/// Map a lock command payload to the state it leads to.
#[must_use]
pub fn lock_state_for(payload: &[u8]) -> Option<LockState> {
    match payload {
        b"LOCK" => Some(LockState::Locked),
        b"UNLOCK" | b"OPEN" => Some(LockState::Unlocked),
        _ => None,
    }
}

/// Map a cover command payload to the state it leads to.
#[must_use]
pub fn cover_state_for(payload: &[u8]) -> Option<CoverState> {
    match payload {
        b"OPEN" => Some(CoverState::Open),
        b"CLOSE" => Some(CoverState::Closed),
        b"STOP" => Some(CoverState::Stopped),
        _ => None,
    }
}

fn forward(commands: &mpsc::UnboundedSender<Command>, make: fn(&[u8]) -> Command) -> CommandHandler {
    let commands = commands.clone();
    command_handler(move |topic, payload| {
        tracing::info!(topic, payload = %String::from_utf8_lossy(payload), "command received");
        if commands.send(make(payload)).is_err() {
            tracing::warn!(topic, "command loop stopped, dropping command");
        }
    })
}

pub struct DemoDevice<T> {
    door: Arc<BinarySensor<T>>,
    temperature: Arc<Sensor<T>>,
    uptime: Arc<Sensor<T>>,
    lock: Arc<Lock<T>>,
    cover: Arc<Cover<T>>,
    started_at: Instant,
}

impl<T: Transport + 'static> DemoDevice<T> {
    /// Build the demo entities and register them with `hass`.
    ///
    /// Registration failures are logged; the entity stays tracked and is
    /// announced again on the next hub restart.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if an entity cannot be built.
    pub async fn register(
        hass: &Hass<T>,
        device: &Arc<Device>,
        commands: &mpsc::UnboundedSender<Command>,
    ) -> Result<Self, HassError> {
        let door = Arc::new(BinarySensor::new(
            hass,
            device,
            "door",
            "Door",
            Some(BinarySensorClass::Door),
        )?);
        let temperature = Arc::new(
            SensorBuilder::new("temperature", "Temperature")
                .device_class(SensorClass::Temperature)
                .unit_of_measurement("°C")
                .build(hass, device)?,
        );
        let uptime = Arc::new(
            SensorBuilder::new("uptime", "Uptime")
                .device_class(SensorClass::Duration)
                .unit_of_measurement("s")
                .entity_category(EntityCategory::Diagnostic)
                .build(hass, device)?,
        );
        let restart = Arc::new(Button::new(
            device,
            "restart",
            "Restart",
            Some(ButtonClass::Restart),
            forward(commands, |_| Command::Restart),
        )?);
        let lock = Arc::new(Lock::new(
            hass,
            device,
            "lock",
            "Lock",
            forward(commands, |payload| Command::Lock(payload.to_vec())),
        )?);
        let cover = Arc::new(Cover::new(
            hass,
            device,
            "cover",
            "Garage door",
            Some(CoverClass::Garage),
            forward(commands, |payload| Command::Cover(payload.to_vec())),
        )?);

        let entities: [Arc<dyn Entity>; 6] = [
            door.clone(),
            temperature.clone(),
            uptime.clone(),
            restart,
            lock.clone(),
            cover.clone(),
        ];
        for entity in entities {
            let name = entity.name().to_string();
            if let Err(err) = hass.register_entity(entity).await {
                tracing::warn!(entity = %name, error = %err, "discovery failed");
            }
        }

        Ok(Self {
            door,
            temperature,
            uptime,
            lock,
            cover,
            started_at: Instant::now(),
        })
    }

    /// Publish an initial value for every stateful entity.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] on the first failed publish.
    pub async fn publish_initial_states(&self) -> Result<(), HassError> {
        self.door.update_state(BinarySensorState::Off).await?;
        self.temperature.update_state(21.5).await?;
        self.lock.update_state(LockState::Locked).await?;
        self.cover.update_state(CoverState::Closed).await?;
        self.refresh_uptime().await
    }

    /// Publish the seconds elapsed since start (or since the last restart).
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn refresh_uptime(&self) -> Result<(), HassError> {
        self.uptime
            .update_state(self.started_at.elapsed().as_secs())
            .await
    }

    /// Apply a command and echo the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if publishing the new state fails.
    pub async fn apply(&mut self, command: Command) -> Result<(), HassError> {
        match command {
            Command::Restart => {
                tracing::info!("restart requested");
                self.started_at = Instant::now();
                self.refresh_uptime().await
            }
            Command::Lock(payload) => match lock_state_for(&payload) {
                Some(state) => self.lock.update_state(state).await,
                None => {
                    tracing::warn!(payload = %String::from_utf8_lossy(&payload), "unsupported lock command");
                    Ok(())
                }
            },
            Command::Cover(payload) => match cover_state_for(&payload) {
                Some(state) => {
                    self.door
                        .update_state(BinarySensorState::from(state != CoverState::Closed))
                        .await?;
                    self.cover.update_state(state).await
                }
                None => {
                    tracing::warn!(payload = %String::from_utf8_lossy(&payload), "unsupported cover command");
                    Ok(())
                }
            },
        }
    }
}
