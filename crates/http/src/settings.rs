//! HTTP/2 SETTINGS values
//!
//! [`Http2Settings`] is an opaque identifier-to-value map. The bridge never
//! interprets it; it only carries the framework's initial settings from the
//! construction sequence into the handler factory.

use std::collections::BTreeMap;
use std::fmt;

use iny_config::Http2Config;

/// A set of HTTP/2 settings keyed by setting identifier (RFC 9113 §6.5.2)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Http2Settings {
    values: BTreeMap<u16, u32>,
}

impl Http2Settings {
    pub const HEADER_TABLE_SIZE: u16 = 0x1;
    pub const ENABLE_PUSH: u16 = 0x2;
    pub const MAX_CONCURRENT_STREAMS: u16 = 0x3;
    pub const INITIAL_WINDOW_SIZE: u16 = 0x4;
    pub const MAX_FRAME_SIZE: u16 = 0x5;
    pub const MAX_HEADER_LIST_SIZE: u16 = 0x6;

    /// Create an empty settings set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial settings a connection advertises from configuration.
    /// Optional fields left unset are omitted so the protocol default applies.
    pub fn from_config(config: &Http2Config) -> Self {
        let mut settings = Self::new()
            .with(Self::MAX_CONCURRENT_STREAMS, config.max_concurrent_streams)
            .with(Self::INITIAL_WINDOW_SIZE, config.initial_window_size)
            .with(Self::MAX_FRAME_SIZE, config.max_frame_size);

        if let Some(size) = config.header_table_size {
            settings.insert(Self::HEADER_TABLE_SIZE, size);
        }
        if let Some(push) = config.enable_push {
            settings.insert(Self::ENABLE_PUSH, u32::from(push));
        }
        if let Some(size) = config.max_header_list_size {
            settings.insert(Self::MAX_HEADER_LIST_SIZE, size);
        }
        settings
    }

    /// Builder-style insert
    pub fn with(mut self, id: u16, value: u32) -> Self {
        self.insert(id, value);
        self
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, id: u16, value: u32) -> Option<u32> {
        self.values.insert(id, value)
    }

    pub fn get(&self, id: u16) -> Option<u32> {
        self.values.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate settings in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }
}

impl fmt::Display for Http2Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (id, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", setting_name(id), value)?;
        }
        f.write_str("}")
    }
}

fn setting_name(id: u16) -> String {
    match id {
        Http2Settings::HEADER_TABLE_SIZE => "HEADER_TABLE_SIZE".to_string(),
        Http2Settings::ENABLE_PUSH => "ENABLE_PUSH".to_string(),
        Http2Settings::MAX_CONCURRENT_STREAMS => "MAX_CONCURRENT_STREAMS".to_string(),
        Http2Settings::INITIAL_WINDOW_SIZE => "INITIAL_WINDOW_SIZE".to_string(),
        Http2Settings::MAX_FRAME_SIZE => "MAX_FRAME_SIZE".to_string(),
        Http2Settings::MAX_HEADER_LIST_SIZE => "MAX_HEADER_LIST_SIZE".to_string(),
        other => format!("0x{:x}", other),
    }
}
