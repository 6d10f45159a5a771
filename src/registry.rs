//! Message type registry
//!
//! A closed table mapping one-byte type codes to category names. Codes 1-5 are
//! reserved for control and flow-control traffic; codes from 10 upward belong to
//! plugins, one plugin per code. Adding a category means adding a constant and a
//! row to [`REGISTRY`]; nothing is registered at runtime and collisions are not
//! detected here.

/// Message type code
pub type MessageType = u8;

/// Acknowledges a data message
pub const ACK: MessageType = 1;
/// Ping request, answered with [`PING_ACK`]
pub const PING: MessageType = 2;
/// Ping answer
pub const PING_ACK: MessageType = 3;
/// Receiver queue is full, sender should pause
pub const QUEUE_LIMIT: MessageType = 4;
/// Receiver queue has capacity again
pub const QUEUE_READY: MessageType = 5;

/// Backlog status plugin
pub const BACKLOG_STATUS: MessageType = 10;
/// CoreStation status plugin
pub const CORESTATION_STATUS: MessageType = 11;
/// syslog-ng forwarding plugin
pub const SYSLOG_NG: MessageType = 12;
/// TinyOS 2.x messages
pub const TOS: MessageType = 20;
/// TinyOS 1.x messages
pub const TOS1X: MessageType = 21;
/// Chunked binary transfer
pub const BINARY: MessageType = 30;
/// Vaisala WXT520 weather station
pub const VAISALA_WXT520: MessageType = 40;
/// Schedule distribution
pub const SCHEDULE: MessageType = 50;
/// GPS readings
pub const GPS: MessageType = 60;
/// OZ47 ozone sensor
pub const OZ47: MessageType = 70;
/// ECVQ-EK3 sensor evaluation kit
pub const ECVQEK3: MessageType = 71;
/// Power manager
pub const POWERMANAGER: MessageType = 72;

/// Highest reserved control code
pub const CONTROL_MAX: MessageType = QUEUE_READY;

/// Lowest code available to plugins
pub const PLUGIN_MIN: MessageType = 10;

/// Every known type code with its category name
pub static REGISTRY: &[(MessageType, &str)] = &[
    (ACK, "ACK"),
    (PING, "PING"),
    (PING_ACK, "PING_ACK"),
    (QUEUE_LIMIT, "QUEUE_LIMIT"),
    (QUEUE_READY, "QUEUE_READY"),
    (BACKLOG_STATUS, "BACKLOG_STATUS"),
    (CORESTATION_STATUS, "CORESTATION_STATUS"),
    (SYSLOG_NG, "SYSLOG_NG"),
    (TOS, "TOS"),
    (TOS1X, "TOS1X"),
    (BINARY, "BINARY"),
    (VAISALA_WXT520, "VAISALA_WXT520"),
    (SCHEDULE, "SCHEDULE"),
    (GPS, "GPS"),
    (OZ47, "OZ47"),
    (ECVQEK3, "ECVQEK3"),
    (POWERMANAGER, "POWERMANAGER"),
];

/// Look up the category name of a type code
#[inline]
pub fn name(code: MessageType) -> Option<&'static str> {
    REGISTRY
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// All registered `(code, name)` pairs
#[inline]
pub fn entries() -> &'static [(MessageType, &'static str)] {
    REGISTRY
}

/// True for the reserved control and flow-control codes
#[inline]
pub const fn is_control(code: MessageType) -> bool {
    code >= ACK && code <= CONTROL_MAX
}

/// True for codes in the plugin range
#[inline]
pub const fn is_plugin(code: MessageType) -> bool {
    code >= PLUGIN_MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(name(PING), Some("PING"));
        assert_eq!(name(BINARY), Some("BINARY"));
        assert_eq!(name(0), None);
        assert_eq!(name(6), None);
        assert_eq!(name(255), None);
    }

    #[test]
    fn test_ranges() {
        for code in ACK..=QUEUE_READY {
            assert!(is_control(code));
            assert!(!is_plugin(code));
        }
        assert!(!is_control(0));
        assert!(!is_control(6));
        assert!(!is_plugin(9));
        assert!(is_plugin(BACKLOG_STATUS));
        assert!(is_plugin(255));
    }

    #[test]
    fn test_table_has_no_collisions() {
        let table = entries();
        for (i, (code, _)) in table.iter().enumerate() {
            assert!(
                table[i + 1..].iter().all(|(other, _)| other != code),
                "type code {} registered twice",
                code
            );
        }
    }

    #[test]
    fn test_plugins_stay_out_of_control_range() {
        for (code, name) in entries() {
            if !is_control(*code) {
                assert!(is_plugin(*code), "{} uses reserved code {}", name, code);
            }
        }
    }
}
