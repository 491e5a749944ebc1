//! Shared configuration for sculpt expand sessions
//!
//! This crate is the single source of truth for the options an expand
//! session is invoked with: which attribute it writes, the initial toggle
//! states, falloff tuning constants and the color fill used by the color
//! target. Everything round-trips through serde so hosts can store presets
//! as JSON.

use serde::{Deserialize, Serialize};

/// Edge sensitivity exponent for the normals falloff
pub const DEFAULT_NORMAL_SENSITIVITY: f32 = 300.0;

/// Number of neighbour-averaging passes applied to the normals falloff
pub const DEFAULT_NORMAL_SMOOTH_ITERATIONS: u32 = 2;

/// Errors produced while loading expand options
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse expand options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Attribute an expand session writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandTarget {
    /// Per-vertex mask in [0, 1]
    Mask,
    /// Per-face grouping ids
    #[default]
    FaceSets,
    /// Per-vertex RGBA color
    Colors,
}

/// Distance metric used to build the falloff field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffType {
    /// Shortest path along the surface
    #[default]
    Geodesic,
    /// Hop count through vertex adjacency
    Topology,
    /// Dissimilarity of vertex normals to the seed normal
    Normals,
    /// Straight-line distance to the seed
    Spherical,
    /// Hop count from the boundary loop nearest the seed
    BoundaryTopology,
}

impl FalloffType {
    /// All metrics in cycling order.
    pub const ALL: [FalloffType; 5] = [
        FalloffType::Geodesic,
        FalloffType::Topology,
        FalloffType::Normals,
        FalloffType::Spherical,
        FalloffType::BoundaryTopology,
    ];

    /// The metric that follows this one when cycling.
    pub fn next(self) -> Self {
        match self {
            FalloffType::Geodesic => FalloffType::Topology,
            FalloffType::Topology => FalloffType::Normals,
            FalloffType::Normals => FalloffType::Spherical,
            FalloffType::Spherical => FalloffType::BoundaryTopology,
            FalloffType::BoundaryTopology => FalloffType::Geodesic,
        }
    }
}

/// How the fill color is composited over the existing vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Mix,
    Add,
    Sub,
    Mul,
    Lighten,
    Darken,
    EraseAlpha,
    AddAlpha,
}

/// Tuning constants for the falloff metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FalloffTuning {
    /// Exponent applied to the accumulated edge factor of the normals metric
    pub normal_sensitivity: f32,
    /// Neighbour-averaging passes applied to the normals metric
    pub normal_smooth_iterations: u32,
    /// Reset the normals field to unreached before smoothing, discarding the
    /// computed similarity. Only useful for reproducing legacy results.
    pub legacy_normal_reset: bool,
}

impl Default for FalloffTuning {
    fn default() -> Self {
        Self {
            normal_sensitivity: DEFAULT_NORMAL_SENSITIVITY,
            normal_smooth_iterations: DEFAULT_NORMAL_SMOOTH_ITERATIONS,
            legacy_normal_reset: false,
        }
    }
}

/// Fill used when the target is [`ExpandTarget::Colors`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFill {
    /// Brush color in sRGB
    pub color: [f32; 3],
    /// Compositing mode
    pub blend_mode: BlendMode,
}

impl Default for ColorFill {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            blend_mode: BlendMode::Mix,
        }
    }
}

/// Options an expand session is invoked with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// Data that is going to be modified
    pub target: ExpandTarget,
    /// Invert the enabled elements
    pub invert: bool,
    /// Keep the previous mask (or compose onto previous face sets)
    pub use_mask_preserve: bool,
    /// Fade the written values along the falloff
    pub use_falloff_gradient: bool,
    /// Write into the active face set instead of a new one
    pub use_modify_active: bool,
    /// Seed from the active vertex instead of the vertex under the pointer
    pub use_expand_from_active: bool,
    pub falloff: FalloffTuning,
    pub fill: ColorFill,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            target: ExpandTarget::FaceSets,
            invert: true,
            use_mask_preserve: false,
            use_falloff_gradient: false,
            use_modify_active: true,
            use_expand_from_active: false,
            falloff: FalloffTuning::default(),
            fill: ColorFill::default(),
        }
    }
}

impl ExpandOptions {
    /// Options for a mask expand with every toggle off
    pub fn mask() -> Self {
        Self {
            target: ExpandTarget::Mask,
            invert: false,
            use_modify_active: false,
            ..Default::default()
        }
    }

    /// Parse options from JSON, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that tuning values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensitivity = self.falloff.normal_sensitivity;
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "falloff.normal_sensitivity",
                reason: format!("expected a finite non-negative number, got {sensitivity}"),
            });
        }
        if let Some(channel) = self.fill.color.iter().find(|c| !c.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "fill.color",
                reason: format!("channel is not finite: {channel}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExpandOptions::default();
        assert_eq!(options.target, ExpandTarget::FaceSets);
        assert!(options.invert);
        assert!(!options.use_mask_preserve);
        assert!(!options.use_falloff_gradient);
        assert!(options.use_modify_active);
        assert!(!options.use_expand_from_active);
        assert_eq!(options.falloff.normal_sensitivity, DEFAULT_NORMAL_SENSITIVITY);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options =
            ExpandOptions::from_json_str(r#"{ "target": "mask", "invert": false }"#).unwrap();
        assert_eq!(options.target, ExpandTarget::Mask);
        assert!(!options.invert);
        assert!(options.use_modify_active);
        assert_eq!(options.fill.blend_mode, BlendMode::Mix);
    }

    #[test]
    fn test_nested_tuning_from_json() {
        let json = r#"{
            "target": "colors",
            "falloff": { "legacy_normal_reset": true },
            "fill": { "color": [1.0, 0.0, 0.0], "blend_mode": "add" }
        }"#;
        let options = ExpandOptions::from_json_str(json).unwrap();
        assert_eq!(options.target, ExpandTarget::Colors);
        assert!(options.falloff.legacy_normal_reset);
        assert_eq!(
            options.falloff.normal_smooth_iterations,
            DEFAULT_NORMAL_SMOOTH_ITERATIONS
        );
        assert_eq!(options.fill.blend_mode, BlendMode::Add);
    }

    #[test]
    fn test_rejects_negative_sensitivity() {
        let result = ExpandOptions::from_json_str(r#"{ "falloff": { "normal_sensitivity": -1.0 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = ExpandOptions::from_json_str("{ target: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_falloff_cycle_visits_every_metric() {
        let mut current = FalloffType::Geodesic;
        for expected in FalloffType::ALL.iter().skip(1) {
            current = current.next();
            assert_eq!(current, *expected);
        }
        assert_eq!(current.next(), FalloffType::Geodesic);
    }
}
