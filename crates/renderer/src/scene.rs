//! Scene context: meshes, their model transforms, the camera and projection.
//! Owned by the driver and passed by reference to whatever draws it.

use std::path::Path;

use anyhow::{Context, Result};
use asset::{LoadOptions, MeshBuffer};
use bytemuck::{Pod, Zeroable};
use corelib::{FlyCamera, Perspective, transform::Transform};
use glam::Mat4;

/// One mesh placed in the world.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshBuffer,
    pub transform: Transform,
}

/// Uniform block for one draw (16-byte aligned, column-major).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

/// Everything needed to issue a non-indexed triangle-list draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    /// Index into [`Scene::objects`].
    pub object: usize,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl DrawItem {
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    pub fn uniforms(&self) -> ObjectUniforms {
        ObjectUniforms {
            model: self.model.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
        }
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    camera: FlyCamera,
    projection: Perspective,
}

impl Scene {
    pub fn new(camera: FlyCamera, projection: Perspective) -> Self {
        Self {
            objects: Vec::new(),
            camera,
            projection,
        }
    }

    /// Returns the index of the new object.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        mesh: MeshBuffer,
        transform: Transform,
    ) -> usize {
        let name = name.into();
        log::debug!(
            "Scene: adding '{}' ({} vertices, {} triangles)",
            name,
            mesh.len(),
            mesh.triangle_count()
        );
        self.objects.push(SceneObject {
            name,
            mesh,
            transform,
        });
        self.objects.len() - 1
    }

    /// Load an OBJ from disk and place it with `transform`.
    pub fn load_object(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        transform: Transform,
        options: LoadOptions,
    ) -> Result<usize> {
        let path = path.as_ref();
        let mesh = asset::load_obj_from_path_with(path, options)
            .with_context(|| format!("Failed to load mesh {}", path.display()))?;
        Ok(self.add_object(name, mesh, transform))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[inline]
    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    pub fn projection(&self) -> &Perspective {
        &self.projection
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.projection.aspect = Perspective::viewport_aspect(width, height);
    }

    pub fn total_vertices(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.len()).sum()
    }

    /// One draw per non-empty object, in insertion order. View and projection
    /// are evaluated once and shared.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let view = self.camera.view_matrix();
        let projection = self.projection.matrix();

        self.objects
            .iter()
            .enumerate()
            .filter_map(|(index, obj)| {
                if obj.mesh.is_empty() {
                    return None;
                }
                let Ok(vertex_count) = u32::try_from(obj.mesh.len()) else {
                    log::warn!("Scene: '{}' has too many vertices to draw", obj.name);
                    return None;
                };
                Some(DrawItem {
                    object: index,
                    model: obj.transform.matrix(),
                    view,
                    projection,
                    first_vertex: 0,
                    vertex_count,
                })
            })
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(FlyCamera::default(), Perspective::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Direction, vec3};
    use glam::Vec4;

    fn triangle() -> MeshBuffer {
        asset::load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n")
            .expect("valid triangle")
    }

    #[test]
    fn draw_list_skips_empty_meshes() {
        let mut scene = Scene::default();
        scene.add_object("a", triangle(), Transform::identity());
        scene.add_object("empty", MeshBuffer::default(), Transform::identity());
        let cat = scene.add_object(
            "cat",
            triangle(),
            Transform::from_degrees(
                vec3(30.0, 0.0, 0.0),
                vec3(90.0, 0.0, 0.0),
                glam::Vec3::splat(0.2),
            ),
        );

        let draws = scene.draw_list();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].object, 0);
        assert_eq!(draws[1].object, cat);
        assert!(draws.iter().all(|d| d.vertex_count == 3 && d.first_vertex == 0));
        assert_eq!(draws[1].model, scene.objects()[cat].transform.matrix());
        assert_eq!(scene.total_vertices(), 6);
    }

    #[test]
    fn draws_follow_the_camera() {
        let mut scene = Scene::default();
        scene.add_object("a", triangle(), Transform::identity());
        let before = scene.draw_list()[0];

        scene.camera_mut().move_in(Direction::Forward, 5.0);
        let after = scene.draw_list()[0];

        assert_ne!(before.view, after.view);
        assert_eq!(after.view, scene.camera().view_matrix());
        assert_eq!(before.model, after.model);
    }

    #[test]
    fn origin_lands_in_front_of_default_camera() {
        let mut scene = Scene::default();
        scene.set_viewport(800, 600);
        scene.add_object("a", triangle(), Transform::identity());

        let clip = scene.draw_list()[0].mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && ndc.z.abs() <= 1.0);
    }

    #[test]
    fn uniforms_are_three_column_major_mat4() {
        let mut scene = Scene::default();
        scene.add_object("a", triangle(), Transform::identity());
        let item = scene.draw_list()[0];
        let uniforms = item.uniforms();
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 3 * 64);
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniforms.view, item.view.to_cols_array_2d());
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut scene = Scene::default();
        scene.set_viewport(1920, 1080);
        assert!((scene.projection().aspect - 16.0 / 9.0).abs() < 1e-6);
        scene.set_viewport(0, 0);
        assert_eq!(scene.projection().aspect, 1.0);
    }

    #[test]
    fn missing_mesh_file_reports_path() {
        let mut scene = Scene::default();
        let err = scene
            .load_object(
                "ghost",
                "no/such/mesh.obj",
                Transform::identity(),
                LoadOptions::default(),
            )
            .unwrap_err();
        assert!(format!("{err:#}").contains("no/such/mesh.obj"));
        assert!(scene.objects().is_empty());
    }
}
