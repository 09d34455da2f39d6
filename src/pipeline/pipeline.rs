use glam::IVec2;
use log::trace;
use minifb::Window;

use crate::{
    config::RenderConfig,
    core::{Camera, Color, Mesh},
};

use super::{
    buffer::Buffer,
    ordering::DepthOrder,
    projection::Projector,
    rasterizer::{draw_polygon_outline, fill_triangle},
    DrawList, FrameStats,
};

pub struct States {
    pub draw_outline: bool,
}

/// Painter's algorithm renderer for a single mesh.
///
/// Each frame:
/// 1. Transform and project every shared vertex once
/// 2. Sort every face far to near by centroid distance
/// 3. Cull faces in that order into the draw list
/// 4. Clear the back buffer and paint the draw list over it
pub struct Pipeline<B: Buffer> {
    back_buffer: B,                // Buffer being rendered to
    projector: Projector,          // Camera space to pixels
    screen: Vec<Option<IVec2>>,    // Per vertex projection for this frame
    order: DepthOrder,             // Scratch space for the depth sort
    draw_list: DrawList,           // Output of process_geometry
    background: Color,
    outline_color: Color,
    pub states: States,
}

impl<B: Buffer> Pipeline<B> {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            back_buffer: B::new(config.width, config.height),
            projector: Projector::new(config.width, config.height, config.near),
            screen: Vec::with_capacity(1024),
            order: DepthOrder::new(),
            draw_list: DrawList::with_capacity(1024),
            background: config.background,
            outline_color: config.outline_color,
            states: States {
                draw_outline: config.draw_outline,
            },
        }
    }

    pub fn buffer(&self) -> &B {
        &self.back_buffer
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Flip outlining, returning the new state.
    pub fn toggle_outline(&mut self) -> bool {
        self.states.draw_outline = !self.states.draw_outline;
        self.states.draw_outline
    }

    /// Render one frame of `mesh` seen from `camera` into the back buffer.
    pub fn render_frame(&mut self, mesh: &Mesh, camera: &Camera) -> FrameStats {
        self.process_geometry(mesh, camera);
        self.rasterize();

        FrameStats {
            visible: self.draw_list.len(),
            total: mesh.faces.len(),
        }
    }

    /// Build the frame's draw list, farthest face first.
    pub fn process_geometry(&mut self, mesh: &Mesh, camera: &Camera) -> &DrawList {
        self.draw_list.clear();
        self.draw_list.outline = self.states.draw_outline.then_some(self.outline_color);

        self.projector
            .project_vertices(&mesh.vertices, camera, &mut self.screen);

        let sorted = self.order.sort(&mesh.faces, camera);
        for &(_, i) in sorted {
            if let Some(projected) =
                self.projector
                    .project_face(&mesh.faces[i], &self.screen, camera)
            {
                self.draw_list.faces.push(projected);
            }
        }

        trace!(
            "{} of {} faces survived culling",
            self.draw_list.len(),
            mesh.faces.len()
        );
        &self.draw_list
    }

    /// Paint the current draw list over a cleared back buffer.
    pub fn rasterize(&mut self) {
        self.back_buffer.clear(self.background);

        for face in &self.draw_list.faces {
            fill_triangle(&mut self.back_buffer, face.points, face.color);
            if let Some(outline) = self.draw_list.outline {
                draw_polygon_outline(&mut self.back_buffer, &face.points, outline);
            }
        }
    }

    pub fn present_window(&self, window: &mut Window) -> Result<(), minifb::Error> {
        self.back_buffer.present_window(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::obj::parse_obj;
    use crate::core::Face;
    use crate::pipeline::FrameBuffer;
    use glam::{IVec2, Vec3};

    fn config() -> RenderConfig {
        RenderConfig {
            width: 100,
            height: 100,
            ..RenderConfig::default()
        }
    }

    /// Two front facing triangles straight ahead of an origin camera, the
    /// nearer one first in the face list.
    fn stacked() -> Mesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (z, color) in [(4.0, Color::WHITE), (8.0, Color::TEAL)] {
            let base = vertices.len() as u32;
            vertices.push(Vec3::new(-1.0, -1.0, z));
            vertices.push(Vec3::new(1.0, -1.0, z));
            vertices.push(Vec3::new(0.0, 1.0, z));
            faces.push(Face::new([base, base + 1, base + 2], &vertices, color));
        }
        Mesh::new(vertices, faces)
    }

    #[test]
    fn empty_mesh_draws_only_background() {
        let mesh = parse_obj("# nothing here\n".as_bytes(), Color::TEAL).unwrap();
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());

        let stats = pipeline.render_frame(&mesh, &Camera::default());
        assert_eq!(stats, FrameStats { visible: 0, total: 0 });
        assert!(pipeline.draw_list().is_empty());
        assert!(pipeline
            .buffer()
            .data
            .iter()
            .all(|&p| p == Color::BACKGROUND.to_u32()));
    }

    #[test]
    fn draw_list_runs_back_to_front() {
        let mesh = stacked();
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());
        let list = pipeline.process_geometry(&mesh, &Camera::default());

        assert_eq!(list.len(), 2);
        assert_eq!(list.faces[0].color, Color::TEAL);
        assert_eq!(list.faces[1].color, Color::WHITE);
        assert_eq!(list.outline, Some(Color::OUTLINE));
    }

    #[test]
    fn nearer_face_paints_over_farther_one() {
        let mesh = stacked();
        let mut cfg = config();
        cfg.draw_outline = false;
        let mut pipeline = Pipeline::<FrameBuffer>::new(&cfg);

        let stats = pipeline.render_frame(&mesh, &Camera::default());
        assert_eq!(stats, FrameStats { visible: 2, total: 2 });
        // near triangle spans 37..=62, the far one 43..=56
        assert_eq!(pipeline.buffer().pixel(50, 50), Some(Color::WHITE));
        assert_eq!(pipeline.buffer().pixel(0, 0), Some(Color::BACKGROUND));
    }

    #[test]
    fn visible_face_lands_on_screen() {
        // stored negated, ends up five units ahead of the camera
        let src = "v 1 1 -5\nv -1 1 -5\nv 0 -1 -5\nf 1 2 3\n";
        let mut mesh = parse_obj(src.as_bytes(), Color::TEAL).unwrap();
        mesh.bake_normals_to_colors();
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());

        let stats = pipeline.render_frame(&mesh, &Camera::default());
        assert_eq!(stats.visible, 1);
        let face = pipeline.draw_list().faces[0];
        assert_eq!(
            face.points,
            [IVec2::new(40, 40), IVec2::new(60, 40), IVec2::new(50, 60)]
        );
        assert_eq!(face.color, Color::new(0, 0, 127));
        assert_eq!(pipeline.buffer().pixel(50, 45), Some(Color::new(0, 0, 127)));
        // vertices carry the outline
        assert_eq!(pipeline.buffer().pixel(40, 40), Some(Color::OUTLINE));
    }

    #[test]
    fn turning_around_culls_everything() {
        let mesh = stacked();
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());
        let camera = Camera::new(Vec3::ZERO, 180.0, 0.0, 0.0);

        let stats = pipeline.render_frame(&mesh, &camera);
        assert_eq!(stats.visible, 0);
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn nan_camera_draws_nothing() {
        let mesh = stacked();
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());
        let camera = Camera::new(Vec3::ZERO, f32::NAN, f32::NAN, 0.0);

        let stats = pipeline.render_frame(&mesh, &camera);
        assert_eq!(stats, FrameStats { visible: 0, total: 2 });
        assert!(pipeline
            .buffer()
            .data
            .iter()
            .all(|&p| p == Color::BACKGROUND.to_u32()));
    }

    #[test]
    fn outline_toggle() {
        let mut pipeline = Pipeline::<FrameBuffer>::new(&config());
        assert!(pipeline.states.draw_outline);
        assert!(!pipeline.toggle_outline());

        let list = pipeline.process_geometry(&stacked(), &Camera::default());
        assert_eq!(list.outline, None);
    }
}
