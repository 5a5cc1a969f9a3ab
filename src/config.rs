//! Game configuration sent by the judge as the first handshake line.
//!
//! The line is JSON-like, but it is not parsed as JSON: structural
//! punctuation is stripped and the remaining tokens are read as alternating
//! key/value pairs. Values stay strings until a caller asks for a type.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::input::parse_bool;

/// Characters that separate keys and values on the configuration line.
const DELIMITERS: &[char] = &['{', '}', '[', ']', '"', ':', ',', ' ', '\t', '\r', '\n'];

/// Failure to parse the configuration line or coerce one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The stripped line did not split into key/value pairs.
    #[error("expected key/value pairs, got {0} tokens")]
    OddTokenCount(usize),
    /// The requested key was not sent.
    #[error("missing key {0}")]
    MissingKey(String),
    /// The stored value does not parse as the requested type.
    #[error("value '{value}' for {key} is not a valid {expected}")]
    Unparsable {
        /// The requested key.
        key: String,
        /// The stored raw value.
        value: String,
        /// The requested type.
        expected: &'static str,
    },
}

/// Key/value settings from the judge, coerced on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDictionary {
    entries: BTreeMap<String, String>,
}

impl ConfigDictionary {
    /// Parse a raw configuration line.
    ///
    /// A repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OddTokenCount`] if the tokens do not pair up.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let tokens: Vec<&str> = raw
            .split(DELIMITERS)
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.len() % 2 != 0 {
            return Err(ConfigError::OddTokenCount(tokens.len()));
        }

        let entries = tokens
            .chunks_exact(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect();

        Ok(Self { entries })
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and raw values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw string value for a key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the key is absent.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Integer value for a key.
    ///
    /// # Errors
    ///
    /// Fails if the key is absent or the value is not an integer.
    pub fn get_int(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.get_str(key)?;
        value.parse().map_err(|_| unparsable(key, value, "integer"))
    }

    /// Floating-point value for a key.
    ///
    /// # Errors
    ///
    /// Fails if the key is absent or the value is not a number.
    pub fn get_float(&self, key: &str) -> Result<f64, ConfigError> {
        let value = self.get_str(key)?;
        value.parse().map_err(|_| unparsable(key, value, "float"))
    }

    /// Boolean value for a key (`true`/`false`, any ASCII case).
    ///
    /// # Errors
    ///
    /// Fails if the key is absent or the value is not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.get_str(key)?;
        parse_bool(value).ok_or_else(|| unparsable(key, value, "boolean"))
    }
}

fn unparsable(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Unparsable {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Holds the configuration once it has been parsed.
///
/// Only the first successful [`ConfigCell::init`] parses; later calls return
/// the stored dictionary and ignore their argument.
#[derive(Debug, Default)]
pub struct ConfigCell {
    inner: OnceCell<ConfigDictionary>,
}

impl ConfigCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw` into the cell unless it is already initialized.
    ///
    /// # Errors
    ///
    /// Returns the parse error if this is the first call and `raw` is malformed.
    pub fn init(&self, raw: &str) -> Result<&ConfigDictionary, ConfigError> {
        if let Some(existing) = self.inner.get() {
            return Ok(existing);
        }
        let parsed = ConfigDictionary::parse(raw)?;
        Ok(self.inner.get_or_init(|| parsed))
    }

    /// The stored dictionary, if initialized.
    #[must_use]
    pub fn get(&self) -> Option<&ConfigDictionary> {
        self.inner.get()
    }
}

/// Wire keys of the settings the client reads.
pub mod keys {
    /// Cost to spawn a unit.
    pub const SPAWN_COST: &str = "NEW_ENTITY_ENERGY_COST";
    /// Cost to convert a unit into a dropoff.
    pub const DROPOFF_COST: &str = "DROPOFF_COST";
    /// Maximum energy a unit can carry.
    pub const MAX_ENERGY: &str = "MAX_ENERGY";
    /// Number of turns in the game.
    pub const MAX_TURNS: &str = "MAX_TURNS";
    /// A unit extracts 1/`EXTRACT_RATIO` of a cell's energy per turn.
    pub const EXTRACT_RATIO: &str = "EXTRACT_RATIO";
    /// Moving off a cell costs 1/`MOVE_COST_RATIO` of its energy.
    pub const MOVE_COST_RATIO: &str = "MOVE_COST_RATIO";
    /// Whether inspiration is enabled.
    pub const INSPIRATION_ENABLED: &str = "INSPIRATION_ENABLED";
    /// Distance within which opponents count towards inspiration.
    pub const INSPIRATION_RADIUS: &str = "INSPIRATION_RADIUS";
    /// Opponent units needed within the radius to inspire.
    pub const INSPIRATION_SHIP_COUNT: &str = "INSPIRATION_SHIP_COUNT";
    /// Extraction ratio for an inspired unit.
    pub const INSPIRED_EXTRACT_RATIO: &str = "INSPIRED_EXTRACT_RATIO";
    /// Bonus multiplier on energy extracted while inspired.
    pub const INSPIRED_BONUS_MULTIPLIER: &str = "INSPIRED_BONUS_MULTIPLIER";
    /// Move cost ratio for an inspired unit.
    pub const INSPIRED_MOVE_COST_RATIO: &str = "INSPIRED_MOVE_COST_RATIO";
}

/// Typed view of the game settings used by decision layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constants {
    /// Cost to spawn a unit.
    pub spawn_cost: i64,
    /// Cost to convert a unit into a dropoff.
    pub dropoff_cost: i64,
    /// Maximum energy a unit can carry.
    pub max_energy: i64,
    /// Number of turns in the game.
    pub max_turns: i64,
    /// Extraction ratio.
    pub extract_ratio: i64,
    /// Move cost ratio.
    pub move_cost_ratio: i64,
    /// Whether inspiration is enabled.
    pub inspiration_enabled: bool,
    /// Inspiration radius.
    pub inspiration_radius: i64,
    /// Opponent units needed for inspiration.
    pub inspiration_ship_count: i64,
    /// Extraction ratio while inspired.
    pub inspired_extract_ratio: i64,
    /// Bonus multiplier while inspired.
    pub inspired_bonus_multiplier: f64,
    /// Move cost ratio while inspired.
    pub inspired_move_cost_ratio: i64,
}

impl Constants {
    /// Read every named setting from the dictionary.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed key.
    pub fn from_dictionary(dict: &ConfigDictionary) -> Result<Self, ConfigError> {
        Ok(Self {
            spawn_cost: dict.get_int(keys::SPAWN_COST)?,
            dropoff_cost: dict.get_int(keys::DROPOFF_COST)?,
            max_energy: dict.get_int(keys::MAX_ENERGY)?,
            max_turns: dict.get_int(keys::MAX_TURNS)?,
            extract_ratio: dict.get_int(keys::EXTRACT_RATIO)?,
            move_cost_ratio: dict.get_int(keys::MOVE_COST_RATIO)?,
            inspiration_enabled: dict.get_bool(keys::INSPIRATION_ENABLED)?,
            inspiration_radius: dict.get_int(keys::INSPIRATION_RADIUS)?,
            inspiration_ship_count: dict.get_int(keys::INSPIRATION_SHIP_COUNT)?,
            inspired_extract_ratio: dict.get_int(keys::INSPIRED_EXTRACT_RATIO)?,
            inspired_bonus_multiplier: dict.get_float(keys::INSPIRED_BONUS_MULTIPLIER)?,
            inspired_move_cost_ratio: dict.get_int(keys::INSPIRED_MOVE_COST_RATIO)?,
        })
    }
}
