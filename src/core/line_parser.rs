//! Sensor line parser: `pitch,<ignored>,angular_rate_z,trigger`
//!
//! Lines with fewer than 4 fields are dropped. Each used field parses
//! independently; a field that fails (or is not finite) is left out of the
//! update so the held value survives.

use crate::types::{FrameUpdate, TriggerLevel};

const MIN_FIELDS: usize = 4;
const FIELD_PITCH: usize = 0;
const FIELD_ANGULAR_RATE_Z: usize = 2;
const FIELD_TRIGGER: usize = 3;

/// Stateless decoder for one device's sensor lines
#[derive(Debug, Default, Clone, Copy)]
pub struct SensorLineParser;

impl SensorLineParser {
    /// Create new parser
    pub fn new() -> Self {
        Self
    }

    /// Decode one line; `None` if the line carries nothing usable
    pub fn parse(&self, line: &str) -> Option<FrameUpdate> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }

        let update = FrameUpdate {
            pitch: parse_finite(fields[FIELD_PITCH]),
            angular_rate_z: parse_finite(fields[FIELD_ANGULAR_RATE_Z]),
            trigger: fields[FIELD_TRIGGER]
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(TriggerLevel::from_raw),
        };

        if update.is_empty() {
            None
        } else {
            Some(update)
        }
    }
}

/// Parse a float, rejecting NaN and infinities
fn parse_finite(field: &str) -> Option<f32> {
    field.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_line() {
        let parser = SensorLineParser::new();
        let update = parser.parse("12.5,0.0,-3.25,1\r\n").unwrap();
        assert_eq!(update.pitch, Some(12.5));
        assert_eq!(update.angular_rate_z, Some(-3.25));
        assert_eq!(update.trigger, Some(TriggerLevel::Pressed));
    }

    #[test]
    fn test_field_one_is_ignored() {
        let parser = SensorLineParser::new();
        let update = parser.parse("1.0,garbage,2.0,0").unwrap();
        assert_eq!(update.pitch, Some(1.0));
        assert_eq!(update.angular_rate_z, Some(2.0));
        assert_eq!(update.trigger, Some(TriggerLevel::Released));
    }

    #[test]
    fn test_too_few_fields_dropped() {
        let parser = SensorLineParser::new();
        assert!(parser.parse("1.0,2.0,3.0").is_none());
        assert!(parser.parse("").is_none());
        assert!(parser.parse("\r\n").is_none());
    }

    #[test]
    fn test_extra_fields_tolerated() {
        let parser = SensorLineParser::new();
        let update = parser.parse("1,2,3,0,99,100").unwrap();
        assert_eq!(update.pitch, Some(1.0));
    }

    #[test]
    fn test_bad_field_is_absent_not_zero() {
        let parser = SensorLineParser::new();
        let update = parser.parse("abc,0,4.5,1").unwrap();
        assert_eq!(update.pitch, None);
        assert_eq!(update.angular_rate_z, Some(4.5));
        assert_eq!(update.trigger, Some(TriggerLevel::Pressed));
    }

    #[test]
    fn test_non_finite_rejected() {
        let parser = SensorLineParser::new();
        let update = parser.parse("NaN,0,inf,0").unwrap();
        assert_eq!(update.pitch, None);
        assert_eq!(update.angular_rate_z, None);
        assert_eq!(update.trigger, Some(TriggerLevel::Released));
    }

    #[test]
    fn test_trigger_out_of_range_rejected() {
        let parser = SensorLineParser::new();
        let update = parser.parse("1,0,1,7").unwrap();
        assert_eq!(update.trigger, None);
    }

    #[test]
    fn test_all_fields_bad_yields_nothing() {
        let parser = SensorLineParser::new();
        assert!(parser.parse("x,y,z,w").is_none());
    }
}
