use serde::{Deserialize, Deserializer};

use crate::error::FrustumError;

/// Projection convention used to flare the frustum toward each light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "i64")]
pub enum BarnMode {
    /// Filter corners look at the opposite light corner, giving a perspective frustum.
    #[default]
    Physical,
    /// Filter corners project along a fixed direction (or toward an apex), giving an
    /// orthographic-like frustum.
    Analytic,
}

impl TryFrom<i64> for BarnMode {
    type Error = FrustumError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BarnMode::Physical),
            1 => Ok(BarnMode::Analytic),
            _ => Err(FrustumError::InvalidBarnMode(value)),
        }
    }
}

/// On/off switch written either as a TOML bool or as the 0/1 integer the host stores.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    return match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1, got {}",
            other
        ))),
    };
}

/// Scalar settings of one barn light filter, read fresh from the filter before each build.
/// Width, height and radius use authoring units, the geometry halves them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FilterParameters {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    /// Softness amount, grows the soft shapes by `1 + edge`.
    pub edge: f32,
    // Per side softness multipliers, only used in edge mode.
    pub left_edge: f32,
    pub right_edge: f32,
    pub top_edge: f32,
    pub bottom_edge: f32,
    // Per side position offsets.
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub scale_width: f32,
    pub scale_height: f32,
    pub barn_mode: BarnMode,
    #[serde(deserialize_with = "flag")]
    pub directional: bool,
    #[serde(deserialize_with = "flag")]
    pub use_light_direction: bool,
    pub shear_x: f32,
    pub shear_y: f32,
    /// Distance of the projection apex in analytic mode.
    pub apex: f32,
    /// Carried along with the filter settings, the wireframe is the same either way.
    #[serde(deserialize_with = "flag")]
    pub invert: bool,
    /// Distance of the far shapes from the filter plane.
    pub depth: f32,
    /// Circle subdivisions of the rounded rect, a multiple of 4.
    pub subdivisions: u32,
    /// Widen each side by `edge * side_edge` when building the base shape.
    #[serde(deserialize_with = "flag")]
    pub edge_mode: bool,
}

impl Default for FilterParameters {
    fn default() -> Self {
        return Self {
            width: 1.0,
            height: 1.0,
            radius: 1.0,
            edge: 0.0,
            left_edge: 0.0,
            right_edge: 0.0,
            top_edge: 0.0,
            bottom_edge: 0.0,
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            scale_width: 1.0,
            scale_height: 1.0,
            barn_mode: BarnMode::Physical,
            directional: false,
            use_light_direction: false,
            shear_x: 0.0,
            shear_y: 0.0,
            apex: 25.0,
            invert: false,
            depth: 10.0,
            subdivisions: 32,
            edge_mode: false,
        };
    }
}

impl FilterParameters {
    /// Scale applied to near and far shapes to get their soft counterparts.
    pub fn soft_scale(&self) -> f32 {
        return 1.0 + self.edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barn_mode_from_integer() {
        assert_eq!(BarnMode::try_from(0).unwrap(), BarnMode::Physical);
        assert_eq!(BarnMode::try_from(1).unwrap(), BarnMode::Analytic);
        assert!(matches!(BarnMode::try_from(2), Err(FrustumError::InvalidBarnMode(2))));
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let params: FilterParameters = toml::from_str(
            r#"
            width = 2.0
            barnMode = 1
            shearX = 0.25
            useLightDirection = true
            "#,
        )
        .unwrap();
        assert_eq!(params.width, 2.0);
        assert_eq!(params.barn_mode, BarnMode::Analytic);
        assert_eq!(params.shear_x, 0.25);
        assert!(params.use_light_direction);
        assert_eq!(params.height, 1.0);
        assert_eq!(params.apex, 25.0);
        assert_eq!(params.subdivisions, 32);
        assert!(!params.edge_mode);
    }

    #[test]
    fn switches_accept_integers_and_bools() {
        let params: FilterParameters = toml::from_str(
            r#"
            directional = 1
            useLightDirection = 0
            invert = true
            edgeMode = 1
            "#,
        )
        .unwrap();
        assert!(params.directional);
        assert!(!params.use_light_direction);
        assert!(params.invert);
        assert!(params.edge_mode);

        let result: Result<FilterParameters, _> = toml::from_str("directional = 2");
        assert!(result.is_err());
    }

    #[test]
    fn shape_axis_is_not_a_filter_setting() {
        // The filter is always drawn in its XY plane.
        let result: Result<FilterParameters, _> = toml::from_str("axis = 0");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_barn_mode_fails_to_parse() {
        let result: Result<FilterParameters, _> = toml::from_str("barnMode = 3");
        assert!(result.is_err());
    }
}
