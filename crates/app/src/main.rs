//! Entry point: headless scene driver.
//! Loads the configured meshes, runs a fixed-step frame loop feeding the
//! fly camera, then reports what would be drawn.

mod config;

use anyhow::{Context, Result};
use asset::LoadOptions;
use corelib::{CameraController, FlyCamera, Perspective};
use renderer::Scene;

use crate::config::AppConfig;

fn build_scene(cfg: &AppConfig) -> Result<Scene> {
    let camera = FlyCamera::new(cfg.camera).context("Invalid camera configuration")?;
    let projection =
        Perspective::default().with_aspect(Perspective::viewport_aspect(cfg.width, cfg.height));
    let mut scene = Scene::new(camera, projection);

    let options = LoadOptions {
        face_mode: cfg.face_mode,
    };
    for spec in &cfg.meshes {
        scene.load_object(spec.name.clone(), &spec.path, spec.transform, options)?;
    }
    Ok(scene)
}

/// Simulated frame loop: cursor drift and held keys, `frames` times.
fn run_frames(scene: &mut Scene, cfg: &AppConfig) {
    let mut controller = CameraController::new(cfg.speed);
    controller.constrain_pitch = cfg.constrain_pitch;
    for &dir in &cfg.walk {
        controller.set_key(dir, true);
    }

    let (mut cursor_x, mut cursor_y) = (cfg.width as f64 / 2.0, cfg.height as f64 / 2.0);
    for frame in 0..=cfg.frames {
        if let Err(e) = controller.cursor_moved(scene.camera_mut(), cursor_x, cursor_y) {
            log::warn!("Frame {}: {}", frame, e);
        }
        if frame == cfg.frames {
            break;
        }
        controller.update(scene.camera_mut(), cfg.dt);
        cursor_x += f64::from(cfg.look.0);
        cursor_y += f64::from(cfg.look.1);
    }
}

fn report(scene: &Scene) {
    for draw in scene.draw_list() {
        let obj = &scene.objects()[draw.object];
        match obj.mesh.bounds() {
            Some(b) => log::info!(
                "Draw '{}': {} vertices ({} triangles), extent {:.3?}",
                obj.name,
                draw.vertex_count,
                draw.vertex_count / 3,
                b.extent()
            ),
            None => log::info!("Draw '{}': {} vertices", obj.name, draw.vertex_count),
        }
    }

    let cam = scene.camera();
    log::info!(
        "Camera: position={:.3}, yaw={:.2}°, pitch={:.2}°, front={:.3}",
        cam.position(),
        cam.yaw(),
        cam.pitch(),
        cam.front()
    );
    log::debug!("View matrix (column-major): {:?}", cam.view_matrix().to_cols_array());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_env()?;
    log::info!(
        "Starting scene: {} mesh(es), {} frames at dt={:.4}s, viewport {}x{}",
        cfg.meshes.len(),
        cfg.frames,
        cfg.dt,
        cfg.width,
        cfg.height
    );

    let mut scene = build_scene(&cfg)?;
    log::info!(
        "Scene ready: {} object(s), {} vertices total",
        scene.objects().len(),
        scene.total_vertices()
    );

    run_frames(&mut scene, &cfg);
    report(&scene);

    log::info!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Direction, vec3};

    fn headless_config(walk: Vec<Direction>, look: (f32, f32)) -> AppConfig {
        AppConfig {
            meshes: Vec::new(),
            frames: 60,
            dt: 0.1,
            walk,
            look,
            ..AppConfig::default()
        }
    }

    #[test]
    fn walking_forward_moves_by_speed_times_time() {
        let cfg = headless_config(vec![Direction::Forward], (0.0, 0.0));
        let mut scene = build_scene(&cfg).unwrap();
        run_frames(&mut scene, &cfg);
        // 60 frames * 0.1s * 10 u/s down -Z
        assert!(
            scene
                .camera()
                .position()
                .abs_diff_eq(vec3(0.0, 4.0, -30.0), 1e-2)
        );
    }

    #[test]
    fn cursor_drift_turns_the_camera() {
        // 60 frames * 2px * 0.1°/px = 12° of yaw; moving down 10px/frame clamps
        let cfg = headless_config(Vec::new(), (2.0, 10.0));
        let mut scene = build_scene(&cfg).unwrap();
        run_frames(&mut scene, &cfg);
        assert!((scene.camera().yaw() - -78.0).abs() < 1e-3);
        assert_eq!(scene.camera().pitch(), -45.0);
    }

    #[test]
    fn missing_default_meshes_fail_with_context() {
        let cfg = AppConfig {
            meshes: vec![config::MeshSpec::new(
                "does/not/exist.obj",
                corelib::transform::Transform::identity(),
            )],
            ..AppConfig::default()
        };
        let err = build_scene(&cfg).err().expect("load must fail");
        assert!(format!("{err:#}").contains("does/not/exist.obj"));
    }

    #[test]
    fn vertical_pitch_limit_is_refused() {
        for limit in ["90", "135"] {
            let mut cfg = AppConfig::from_args([format!("--pitch-limit={limit}")]).unwrap();
            cfg.meshes.clear();
            let err = build_scene(&cfg).err().expect("limit must be rejected");
            assert!(format!("{err:#}").contains("Invalid camera configuration"));
        }
    }
}
