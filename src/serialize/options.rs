//! Which sections a full-scene export writes.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// One switch per optional output section. Defaults to everything enabled.
///
/// Options can be loaded from an export profile:
///
/// ```rust,ignore
/// let options = SectionOptions::from_json_str(r#"{ "fog": false, "sprites": false }"#)?;
/// ```
///
/// Keys missing from the profile keep their default (`true`); unknown keys
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct SectionOptions {
    pub fog: bool,
    pub physics: bool,
    pub lights: bool,
    pub cameras: bool,
    /// Scene-level animations and animation groups.
    pub animations: bool,
    /// Materials and multi-materials.
    pub materials: bool,
    pub environment_texture: bool,
    pub skeletons: bool,
    pub transform_nodes: bool,
    pub geometries: bool,
    pub meshes: bool,
    pub morph_target_managers: bool,
    pub reflection_probes: bool,
    pub particle_systems: bool,
    pub post_processes: bool,
    pub sprites: bool,
    pub actions: bool,
    /// Scene-registered extension components.
    pub components: bool,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self::all()
    }
}

macro_rules! section_setters {
    ($($setter:ident => $field:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $setter(mut self, enabled: bool) -> Self {
                self.$field = enabled;
                self
            }
        )*
    };
}

impl SectionOptions {
    #[must_use]
    pub fn all() -> Self {
        Self::uniform(true)
    }

    #[must_use]
    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(on: bool) -> Self {
        Self {
            fog: on,
            physics: on,
            lights: on,
            cameras: on,
            animations: on,
            materials: on,
            environment_texture: on,
            skeletons: on,
            transform_nodes: on,
            geometries: on,
            meshes: on,
            morph_target_managers: on,
            reflection_probes: on,
            particle_systems: on,
            post_processes: on,
            sprites: on,
            actions: on,
            components: on,
        }
    }

    pub fn from_json_str(profile: &str) -> Result<Self> {
        serde_json::from_str(profile).map_err(|e| Error::InvalidOptions(e.to_string()))
    }

    section_setters! {
        with_fog => fog,
        with_physics => physics,
        with_lights => lights,
        with_cameras => cameras,
        with_animations => animations,
        with_materials => materials,
        with_environment_texture => environment_texture,
        with_skeletons => skeletons,
        with_transform_nodes => transform_nodes,
        with_geometries => geometries,
        with_meshes => meshes,
        with_morph_target_managers => morph_target_managers,
        with_reflection_probes => reflection_probes,
        with_particle_systems => particle_systems,
        with_post_processes => post_processes,
        with_sprites => sprites,
        with_actions => actions,
        with_components => components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_keeps_defaults_for_missing_keys() {
        let options = SectionOptions::from_json_str(r#"{ "fog": false, "environmentTexture": false }"#)
            .unwrap();
        assert!(!options.fog);
        assert!(!options.environment_texture);
        assert!(options.meshes);
        assert!(options.components);
    }

    #[test]
    fn profile_rejects_unknown_sections() {
        let err = SectionOptions::from_json_str(r#"{ "shaders": true }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
    }
}
