//! Sensor frame structures

use serde::{Deserialize, Serialize};

/// Raw trigger level reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerLevel {
    #[default]
    Released,
    Pressed,
}

impl TriggerLevel {
    /// Decode the wire value; only 0 and 1 are valid
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(TriggerLevel::Released),
            1 => Some(TriggerLevel::Pressed),
            _ => None,
        }
    }

    pub fn is_pressed(self) -> bool {
        self == TriggerLevel::Pressed
    }
}

/// Most recent value of every sensor field for one device
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Absolute pitch (degrees)
    pub pitch: f32,
    /// Angular rate around Z (degrees / second)
    pub angular_rate_z: f32,
    /// Trigger level
    pub trigger: TriggerLevel,
}

/// Fields decoded from one sensor line.
///
/// A field that failed to parse is `None`; folding leaves the held value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUpdate {
    pub pitch: Option<f32>,
    pub angular_rate_z: Option<f32>,
    pub trigger: Option<TriggerLevel>,
}

impl FrameUpdate {
    /// True if no field parsed
    pub fn is_empty(&self) -> bool {
        self.pitch.is_none() && self.angular_rate_z.is_none() && self.trigger.is_none()
    }
}

impl SensorFrame {
    /// Fold an update into the held frame
    pub fn apply(&mut self, update: FrameUpdate) {
        if let Some(pitch) = update.pitch {
            self.pitch = pitch;
        }
        if let Some(rate) = update.angular_rate_z {
            self.angular_rate_z = rate;
        }
        if let Some(trigger) = update.trigger {
            self.trigger = trigger;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_missing_fields() {
        let mut frame = SensorFrame {
            pitch: 12.0,
            angular_rate_z: 3.0,
            trigger: TriggerLevel::Pressed,
        };
        frame.apply(FrameUpdate {
            pitch: Some(4.0),
            angular_rate_z: None,
            trigger: None,
        });
        assert_eq!(frame.pitch, 4.0);
        assert_eq!(frame.angular_rate_z, 3.0);
        assert_eq!(frame.trigger, TriggerLevel::Pressed);
    }

    #[test]
    fn test_trigger_from_raw() {
        assert_eq!(TriggerLevel::from_raw(0), Some(TriggerLevel::Released));
        assert_eq!(TriggerLevel::from_raw(1), Some(TriggerLevel::Pressed));
        assert_eq!(TriggerLevel::from_raw(2), None);
        assert_eq!(TriggerLevel::from_raw(-1), None);
    }
}
