//! Handle-or-value arguments for [`Scene::spawn`](crate::scene::Scene::spawn).
//!
//! Passing a resource by value registers it with the scene's
//! [`AssetServer`] (deduplicated by uuid); passing a handle uses it as is.
//!
//! ```rust,ignore
//! scene.spawn("a", Geometry::new(), StandardMaterial::new("m", Vec3::ONE));
//! scene.spawn("b", shared_geometry, shared_material);
//! ```

use crate::assets::{AssetServer, GeometryHandle, MaterialHandle};
use crate::resources::geometry::Geometry;
use crate::resources::material::{Material, MultiMaterial, PhysicalMaterial, StandardMaterial};

// ---------------------------------------------------------------------------
// Material resolution
// ---------------------------------------------------------------------------

pub trait ResolveMaterial {
    fn resolve(self, assets: &AssetServer) -> MaterialHandle;
}

impl ResolveMaterial for MaterialHandle {
    #[inline]
    fn resolve(self, _assets: &AssetServer) -> MaterialHandle {
        self
    }
}

impl ResolveMaterial for Material {
    #[inline]
    fn resolve(self, assets: &AssetServer) -> MaterialHandle {
        assets.materials.add(self)
    }
}

macro_rules! impl_resolve_material {
    ($($ty:ty),*) => {
        $(
            impl ResolveMaterial for $ty {
                #[inline]
                fn resolve(self, assets: &AssetServer) -> MaterialHandle {
                    assets.materials.add(Material::from(self))
                }
            }
        )*
    };
}

impl_resolve_material!(StandardMaterial, PhysicalMaterial, MultiMaterial);

// ---------------------------------------------------------------------------
// Geometry resolution
// ---------------------------------------------------------------------------

pub trait ResolveGeometry {
    fn resolve(self, assets: &AssetServer) -> GeometryHandle;
}

impl ResolveGeometry for GeometryHandle {
    #[inline]
    fn resolve(self, _assets: &AssetServer) -> GeometryHandle {
        self
    }
}

impl ResolveGeometry for Geometry {
    #[inline]
    fn resolve(self, assets: &AssetServer) -> GeometryHandle {
        assets.geometries.add(self)
    }
}
