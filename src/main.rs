//! Headless free-flight demo.
//!
//! Drives a [`Camera`] through a scripted input timeline at a simulated
//! 60 Hz and logs the pose as it goes. Pass a TOML options file as the
//! first argument to override the defaults; run with `RUST_LOG=debug` for
//! the per-frame trace.

use std::path::Path;

use camkit::camera::{Camera, CameraUniform, FreeFlightNavigator};
use camkit::error::KernelError;
use camkit::input::{
    dispatch, InputEvent, InputListener, InputProcessor, MouseButton,
};
use camkit::options::Options;
use camkit::util::FrameClock;
use web_time::{Duration, Instant};

const FRAME: Duration = Duration::from_nanos(16_666_667);
const FRAMES: u32 = 360;

/// One scripted input, fired at the start of its frame.
#[derive(Debug, Clone, Copy)]
enum Scripted {
    Key(&'static str, bool),
    Event(InputEvent),
}

fn timeline() -> Vec<(u32, Scripted)> {
    let button = |pressed| {
        Scripted::Event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed,
        })
    };
    let cursor = |x, y| Scripted::Event(InputEvent::CursorMoved { x, y });

    let mut script = vec![
        (0, cursor(400.0, 300.0)),
        (10, Scripted::Key("KeyW", true)),
        (90, Scripted::Event(InputEvent::ModifiersChanged { shift: true })),
        (
            150,
            Scripted::Event(InputEvent::ModifiersChanged { shift: false }),
        ),
        (180, Scripted::Key("KeyW", false)),
        (200, button(true)),
    ];
    // Sweep the pointer right and slightly up while look is held.
    for step in 1..=40_u16 {
        let x = 400.0 + f32::from(step) * 5.0;
        let y = 300.0 - f32::from(step);
        script.push((200 + u32::from(step), cursor(x, y)));
    }
    script.extend([
        (250, button(false)),
        (260, Scripted::Key("KeyD", true)),
        (262, Scripted::Key("PageUp", true)),
        (300, Scripted::Key("KeyD", false)),
        (300, Scripted::Key("PageUp", false)),
    ]);
    script
}

fn load_options() -> Result<Options, KernelError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading options from {path}");
            Options::load(Path::new(&path))
        }
        None => Ok(Options::default()),
    }
}

fn run() -> Result<(), KernelError> {
    let options = load_options()?;

    let mut camera = Camera::from_options(&options.camera)?;
    let navigator = FreeFlightNavigator::from_options(options.navigator)?;
    camera.set_controller(Some(Box::new(navigator)))?;
    let mut processor =
        InputProcessor::with_keybindings(options.keybindings);

    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start, 60, 0.1);
    let script = timeline();
    let mut next = 0;

    for frame in 1..=FRAMES {
        while let Some(&(at, input)) = script.get(next) {
            if at > frame {
                break;
            }
            next += 1;
            let latched = match input {
                Scripted::Key(key, pressed) => {
                    processor.handle_key(key, pressed)
                }
                Scripted::Event(event) => processor.handle_event(event),
            };
            if let Some(latched) = latched {
                let mut listeners: [&mut dyn InputListener; 1] =
                    [&mut camera];
                let _ = dispatch(&mut listeners, &latched);
            }
        }

        let dt = clock.tick_at(start + FRAME * frame);
        camera.update(dt);

        if frame % 30 == 0 {
            log::info!(
                "frame {frame:>3}: position {} direction {}",
                camera.position(),
                camera.direction()
            );
        }
        log::debug!("frame {frame}: view {}", camera.view());
    }

    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera);
    log::info!(
        "Final pose: position {:?}, forward {:?}, {:.1} fps simulated",
        uniform.position,
        uniform.forward,
        clock.fps()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
