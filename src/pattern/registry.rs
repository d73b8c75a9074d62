//! Pattern registry for named generator lookup.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;
use tracing::debug;

use crate::error::{name, ConfigError, Error, Result};

use super::arcs::DEFAULT_POLE_CLEARANCE;
use super::cylindrical::DEFAULT_MINIMUM_RADIUS;
use super::{
    ArcsConfig, CylindricalConfig, CylindricalRaster, EqualAreaConfig, EqualAreaSphere,
    RandomArcsConfig, ScanPattern, ShellArcs, SortedArcsConfig,
};

/// Maximum number of patterns in the registry.
pub const MAX_PATTERNS: usize = 16;

/// Maximum number of parameters a pattern receives.
pub const MAX_PARAMETERS: usize = 16;

/// Builds a generator from its parameters.
pub type PatternConstructor = fn(&PatternParameters) -> Result<ScanPattern>;

/// Named numeric parameters handed to a pattern constructor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PatternParameters {
    values: FnvIndexMap<String<32>, f64, MAX_PARAMETERS>,
}

// heapless only implements `PartialEq` for maps with `V: Eq`, so compare
// entries by hand (same semantics as heapless's map equality).
impl PartialEq for PatternParameters {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|(k, v)| other.values.get(k) == Some(v))
    }
}

impl PatternParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long or the set is full.
    pub fn insert(&mut self, key: &str, value: f64) -> Result<()> {
        let key_str = String::try_from(key)
            .map_err(|_| Error::Config(ConfigError::InvalidParameter { name: name(key), value }))?;
        self.values
            .insert(key_str, value)
            .map_err(|_| Error::Config(ConfigError::InvalidParameter { name: name(key), value }))?;
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn with(mut self, key: &str, value: f64) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<f64> {
        let key_str = String::<32>::try_from(key).ok()?;
        self.values.get(&key_str).copied()
    }

    /// Look up a required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] when absent.
    pub fn require(&self, key: &str) -> Result<f64> {
        self.get(key)
            .ok_or_else(|| Error::Config(ConfigError::MissingParameter(name(key))))
    }

    /// Look up a parameter, falling back to `default` when absent.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Look up a required non-negative integral parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] when absent and
    /// [`ConfigError::InvalidParameter`] when negative or fractional.
    pub fn get_count(&self, key: &str) -> Result<usize> {
        let value = self.require(key)?;
        as_integer(key, value).map(|v| v as usize)
    }

    /// Look up an optional non-negative integral parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] when present but negative or fractional.
    pub fn get_optional_integer(&self, key: &str) -> Result<Option<u64>> {
        self.get(key).map(|value| as_integer(key, value)).transpose()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn as_integer(key: &str, value: f64) -> Result<u64> {
    if value.is_finite() && value >= 0.0 && libm::trunc(value) == value {
        Ok(value as u64)
    } else {
        Err(Error::Config(ConfigError::InvalidParameter { name: name(key), value }))
    }
}

/// Registry for named scan patterns.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: FnvIndexMap<String<32>, PatternConstructor, MAX_PATTERNS>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            patterns: FnvIndexMap::new(),
        }
    }

    /// Create a registry holding the five built-in generators.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [(&str, PatternConstructor); 5] = [
            ("cylindrical", build_cylindrical),
            ("spherical", build_spherical),
            ("spherical_arcs", build_arcs),
            ("spherical_arcs_random", build_arcs_random),
            ("spherical_sorted", build_sorted),
        ];
        for (key, constructor) in builtin {
            // Five entries always fit an empty registry.
            let _ = registry.register(key, constructor);
        }
        registry
    }

    /// Register a constructor under a name, replacing an existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long or the registry is full.
    pub fn register(&mut self, key: &str, constructor: PatternConstructor) -> Result<()> {
        let key_str = String::try_from(key)
            .map_err(|_| Error::Config(ConfigError::InvalidName(name(key))))?;

        self.patterns
            .insert(key_str, constructor)
            .map_err(|_| Error::Config(ConfigError::RegistryFull))?;

        debug!(pattern = key, "pattern registered");
        Ok(())
    }

    /// Build the generator registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPattern`] for unregistered names, or the
    /// constructor's own error.
    pub fn create(&self, key: &str, parameters: &PatternParameters) -> Result<ScanPattern> {
        let constructor = String::<32>::try_from(key)
            .ok()
            .and_then(|k| self.patterns.get(&k).copied())
            .ok_or_else(|| Error::Config(ConfigError::UnknownPattern(name(key))))?;

        constructor(parameters)
    }

    /// Check if a pattern exists.
    pub fn contains(&self, key: &str) -> bool {
        String::<32>::try_from(key)
            .map(|k| self.patterns.contains_key(&k))
            .unwrap_or(false)
    }

    /// Remove a pattern by name.
    pub fn remove(&mut self, key: &str) -> Option<PatternConstructor> {
        let key_str = String::<32>::try_from(key).ok()?;
        self.patterns.remove(&key_str)
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate over the registered names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(|s| s.as_str())
    }
}

fn build_cylindrical(p: &PatternParameters) -> Result<ScanPattern> {
    let config = CylindricalConfig {
        nr_of_angular_points: p.get_count("nr_of_angular_points")?,
        nr_of_radial_cap_points: p.get_count("nr_of_radial_cap_points")?,
        nr_of_vertical_points: p.get_count("nr_of_vertical_points")?,
        cap_spacing: p.require("cap_spacing")?,
        wall_spacing: p.require("wall_spacing")?,
        radius: p.require("radius")?,
        height: p.require("height")?,
        minimum_radius: p.get_or("minimum_radius", DEFAULT_MINIMUM_RADIUS),
    };
    Ok(CylindricalRaster::new(config)?.into())
}

fn build_spherical(p: &PatternParameters) -> Result<ScanPattern> {
    let config = EqualAreaConfig {
        nr_of_points: p.get_count("nr_of_points")?,
        wall_spacing: p.get_or("wall_spacing", 0.0),
        radius: p.require("radius")?,
    };
    Ok(EqualAreaSphere::new(config)?.into())
}

fn build_arcs(p: &PatternParameters) -> Result<ScanPattern> {
    let config = ArcsConfig {
        nr_of_points: p.get_count("nr_of_points")?,
        wall_spacing: p.require("wall_spacing")?,
        radius: p.require("radius")?,
    };
    Ok(ShellArcs::new_arcs(config)?.into())
}

fn build_arcs_random(p: &PatternParameters) -> Result<ScanPattern> {
    let config = RandomArcsConfig {
        nr_of_points: p.get_count("nr_of_points")?,
        wall_spacing: p.require("wall_spacing")?,
        radius: p.require("radius")?,
        minimum_radius: p.get_or("minimum_radius", DEFAULT_POLE_CLEARANCE),
        seed: p.get_optional_integer("seed")?,
    };
    Ok(ShellArcs::new_random(config)?.into())
}

fn build_sorted(p: &PatternParameters) -> Result<ScanPattern> {
    let config = SortedArcsConfig {
        nr_of_points: p.get_count("nr_of_points")?,
        wall_spacing: p.require("wall_spacing")?,
        radius: p.require("radius")?,
        speaker_width: p.require("speaker_width")?,
        speaker_depth: p.require("speaker_depth")?,
        speaker_height: p.require("speaker_height")?,
    };
    Ok(ShellArcs::new_sorted(config)?.into())
}
