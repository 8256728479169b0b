// Caller-side polling of sensors
//
// The driver never polls on its own. These helpers issue ordinary
// read_sensor calls: either on a tokio interval, notifying an observer when
// the reading changes, or on demand for sensors that must not be read too often.

use std::ops::ControlFlow;
use std::time::Duration;

use embedded_hal::spi::SpiDevice;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::brick::Brick;
use crate::protocol::{BrickError, Result};
use crate::sensor::{SensorPort, SensorValue};

/// What a watched sensor reported
#[derive(Debug)]
pub enum SensorEvent {
    /// First reading, or a reading different from the previous one
    Changed(SensorValue),
    /// The read failed after the sensor was readable (or on the first poll)
    Unavailable(BrickError),
}

/// Poll `port` every `period` until the observer returns `Break`
///
/// The observer only sees transitions: repeated identical readings and
/// repeated failures are not reported again. A zero `period` is rejected.
pub async fn watch_sensor<SPI, F>(
    brick: &mut Brick<SPI>,
    port: SensorPort,
    period: Duration,
    mut observer: F,
) -> Result<()>
where
    SPI: SpiDevice,
    F: FnMut(SensorEvent) -> ControlFlow<()>,
{
    if period.is_zero() {
        return Err(BrickError::Validation(
            "poll period must be non-zero".to_string(),
        ));
    }
    let mut tick = interval(period);
    // None until the first poll; Some(None) while unavailable
    let mut last: Option<Option<SensorValue>> = None;

    debug!("Watching {} every {:?}", port, period);
    loop {
        tick.tick().await;

        let event = match brick.read_sensor(port) {
            Ok(value) => {
                if matches!(&last, Some(Some(prev)) if *prev == value) {
                    continue;
                }
                last = Some(Some(value.clone()));
                SensorEvent::Changed(value)
            }
            Err(e) => {
                if matches!(last, Some(None)) {
                    continue;
                }
                warn!("{} unavailable: {}", port, e);
                last = Some(None);
                SensorEvent::Unavailable(e)
            }
        };

        if observer(event).is_break() {
            return Ok(());
        }
    }
}

/// Last value read from a sensor, refreshed only when asked
pub struct CachedReading {
    port: SensorPort,
    value: Option<SensorValue>,
}

impl CachedReading {
    pub fn new(port: SensorPort) -> Self {
        Self { port, value: None }
    }

    pub fn port(&self) -> SensorPort {
        self.port
    }

    /// Value from the last successful refresh, without touching the bus
    pub fn value(&self) -> Option<&SensorValue> {
        self.value.as_ref()
    }

    /// Read the sensor now; on failure the cached value is kept
    pub fn refresh<SPI: SpiDevice>(&mut self, brick: &mut Brick<SPI>) -> Result<&SensorValue> {
        let value = brick.read_sensor(self.port)?;
        Ok(&*self.value.insert(value))
    }
}
