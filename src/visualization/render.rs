//! Narrow interface between the simulation core and the external renderer.
//!
//! Meshes and textures live in an asset table owned by the rendering side.
//! The core only stores [`RenderHandle`] keys, forwards them with the pose of
//! each body, and asks the table to release them on teardown.

use std::collections::BTreeMap;

use nalgebra::Rotation3;
use tracing::{debug, warn};

use crate::simulation::states::{Mat4, NVec3};

/// Non-owning key into an external asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u32);

/// External asset subsystem that creates and destroys renderables.
pub trait RenderAssets {
    /// Load a mesh (and optional texture). `None` means the load failed and
    /// the body will exist without a visible mesh.
    fn load(&mut self, mesh: &str, texture: Option<&str>) -> Option<RenderHandle>;

    /// Release whatever the handle refers to.
    fn release(&mut self, handle: RenderHandle);
}

/// Non-physical backdrop drawn as the leading render entry.
#[derive(Debug, Clone)]
pub struct Background {
    pub pose: Mat4,
    pub renderable: Option<RenderHandle>,
}

impl Background {
    /// Uniformly scaled to `radius`, tilted by `tilt_degrees` about +X.
    pub fn new(radius: f64, tilt_degrees: f64, renderable: Option<RenderHandle>) -> Self {
        let tilt = Rotation3::from_axis_angle(&NVec3::x_axis(), tilt_degrees.to_radians());
        Self {
            pose: tilt.to_homogeneous() * Mat4::new_scaling(radius),
            renderable,
        }
    }
}

#[derive(Debug, Clone)]
struct AssetEntry {
    mesh: String,
    texture: Option<String>,
}

/// In-memory asset table keyed by integer handle.
///
/// Used for headless runs where nothing is drawn; it still hands out and
/// reclaims handles so the core's bookkeeping can be observed.
#[derive(Debug, Default)]
pub struct HeadlessAssets {
    next: u32,
    live: BTreeMap<RenderHandle, AssetEntry>,
    released: Vec<RenderHandle>,
}

impl HeadlessAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, handle: RenderHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles released so far, in release order.
    pub fn released(&self) -> &[RenderHandle] {
        &self.released
    }

    /// Mesh and texture names a handle was loaded from.
    pub fn source(&self, handle: RenderHandle) -> Option<(&str, Option<&str>)> {
        self.live
            .get(&handle)
            .map(|e| (e.mesh.as_str(), e.texture.as_deref()))
    }
}

impl RenderAssets for HeadlessAssets {
    fn load(&mut self, mesh: &str, texture: Option<&str>) -> Option<RenderHandle> {
        if mesh.trim().is_empty() {
            return None;
        }
        let handle = RenderHandle(self.next);
        self.next += 1;
        self.live.insert(
            handle,
            AssetEntry {
                mesh: mesh.to_owned(),
                texture: texture.map(str::to_owned),
            },
        );
        debug!(?handle, mesh, "loaded headless asset");
        Some(handle)
    }

    fn release(&mut self, handle: RenderHandle) {
        if self.live.remove(&handle).is_none() {
            warn!(?handle, "release of unknown render handle");
            return;
        }
        self.released.push(handle);
    }
}
