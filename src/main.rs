//! Headless walkthrough: drives camera systems and a transform tree with a
//! scripted input sequence and logs what happens.
//!
//! Pass a TOML options string as the first argument to override defaults.

use glam::{Vec2, Vec3};
use vantage::camera::CameraMode;
use vantage::transform::WORLD_UP;
use vantage::{
    CameraSystem, CameraUniform, InputEvent, KeyState, MouseButton, Options,
    Transform, TransformTree, VantageError,
};

const FRAME: f32 = 1.0 / 60.0;
const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

fn key(system: &mut CameraSystem, name: &str, state: KeyState) {
    system.handle_event(&InputEvent::Key {
        key: name.to_owned(),
        state,
    });
}

/// Fly forward for a second, look around, then zoom.
fn first_person_walkthrough(options: &Options) {
    let mut system = CameraSystem::with_options(options);
    system.resize(SCREEN.x as u32, SCREEN.y as u32);
    log::info!("first person start\n{}", system.camera());

    key(&mut system, "KeyW", KeyState::Pressed);
    for _ in 0..60 {
        system.update_with_delta(FRAME);
    }
    key(&mut system, "KeyW", KeyState::Released);

    for x in [640.0, 600.0, 560.0] {
        system.handle_event(&InputEvent::CursorMoved { x, y: 360.0 });
    }
    system.handle_event(&InputEvent::Scroll { delta: 3.0 });
    system.update();
    log::info!("first person end\n{}", system.camera());

    let camera = system.camera();
    let frustum = camera.extract_frustum();
    let ahead = camera.eye_position() + camera.forward() * 10.0;
    let behind = camera.eye_position() - camera.forward() * 10.0;
    log::info!(
        "point ahead visible: {}, point behind visible: {}",
        frustum.contains_point(ahead),
        frustum.contains_point(behind)
    );

    let ray = camera.create_ray_from_screen(Vec2::new(0.0, 0.0), SCREEN);
    log::info!("top-left ray: {:?} -> {:?}", ray.origin, ray.direction);

    let mut uniform = CameraUniform::new();
    uniform.update_from(camera);
    log::info!(
        "uniform block is {} bytes",
        bytemuck::bytes_of(&uniform).len()
    );
}

/// Drag around the origin and scroll in.
fn orbital_walkthrough(options: &Options) {
    let mut options = options.clone();
    options.camera.mode = CameraMode::Orbital;
    let mut system = CameraSystem::with_options(&options);

    system.handle_event(&InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
    });
    for x in (0..=200).step_by(20) {
        system.handle_event(&InputEvent::CursorMoved {
            x: x as f32,
            y: 0.0,
        });
    }
    system.handle_event(&InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    });
    system.handle_event(&InputEvent::Scroll { delta: 4.0 });

    let camera = system.camera();
    log::info!(
        "orbital eye {:?} at distance {} from {:?}",
        camera.eye_position(),
        camera.orbit_distance(),
        camera.target()
    );
}

/// Parent a child under a moving base and reparent it.
fn hierarchy_walkthrough() -> Result<(), VantageError> {
    let mut tree = TransformTree::new();
    let base = tree.insert(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
    let arm = tree.insert(Transform::from_position(Vec3::new(2.0, 0.0, 0.0)));
    tree.set_parent(arm, Some(base))?;
    log::info!("arm world position {:?}", tree.world_position(arm)?);

    tree.set_local_position(base, Vec3::new(5.0, 1.0, 0.0))?;
    tree.look_at(arm, Vec3::ZERO, WORLD_UP)?;
    log::info!(
        "arm after base moved {:?}, facing {:?}",
        tree.world_position(arm)?,
        tree.forward(arm)?
    );

    tree.set_parent(arm, None)?;
    log::info!("arm detached at {:?}", tree.world_position(arm)?);
    Ok(())
}

fn run() -> Result<(), VantageError> {
    let options = match std::env::args().nth(1) {
        Some(text) => Options::from_toml_str(&text)?,
        None => Options::default(),
    };
    log::debug!("options:\n{}", options.to_toml_string()?);

    first_person_walkthrough(&options);
    orbital_walkthrough(&options);
    hierarchy_walkthrough()
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
