#[macro_use]
extern crate clap;

mod analyzer;
mod audio;
mod config;
mod driver;
mod error;
mod fifo;
mod logging;
mod render;
mod view;
mod window;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::messagebox::{show_simple_message_box, MessageBoxFlag};
use sdl2::render::Canvas;
use sdl2::video::Window;
use tracing::{error, info, warn};

use audio::MicInput;
use driver::AppState;
use error::Error;
use render::Renderer;
use view::Bounds;

const TITLE: &str = "specbg";
const IDLE_TITLE: &str = "specbg - click to start";

fn output_bounds(canvas: &Canvas<Window>) -> anyhow::Result<Bounds> {
    let (width, height) = canvas.output_size().map_err(|e| anyhow!(e)).context("getting output size")?;
    Ok(Bounds::new(0, 0, width, height))
}

/// Runs one frame's work between profiler frame markers, so the timing
/// printed on exit always covers a completed frame.
fn profiled<R>(frame: impl FnOnce() -> R) -> R {
    hprof::start_frame();
    let out = frame();
    hprof::end_frame();
    out
}

fn main() -> anyhow::Result<()> {
    let settings = match config::parse(std::env::args_os()) {
        Ok(settings) => settings,
        Err(Error::Args(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };
    logging::init(settings.log_level)?;

    // Take care of listing options first
    if settings.list_windows {
        for name in window::windows().keys() {
            println!("{}", name);
        }
        return Ok(());
    }
    let pa = portaudio::PortAudio::new().context("initializing PortAudio")?;
    if settings.list_devices {
        audio::list_devices(&pa)?;
        return Ok(());
    }

    let sdl = sdl2::init().map_err(|e| anyhow!(e)).context("initializing SDL")?;
    let sdl_video = sdl.video().map_err(|e| anyhow!(e)).context("initializing SDL video")?;
    let display = &settings.display;
    let win = sdl_video
        .window(IDLE_TITLE, display.width, display.height)
        .position_centered()
        .resizable()
        .build()
        .context("creating window")?;
    let mut canvas = win.into_canvas().build().context("creating canvas")?;
    let creator = canvas.texture_creator();
    let mut renderer = Renderer::new(&creator, display.background);

    let rate = Duration::from_secs(1).div_f64(display.gfx_rate);
    let mut app = AppState::new(settings.clone(), output_bounds(&canvas)?);
    let mut eloop = sdl.event_pump().map_err(|e| anyhow!(e)).context("creating event loop")?;
    info!("waiting for a click to start capture");

    'main: loop {
        let deadline = Instant::now() + rate;

        for event in eloop.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => break 'main,
                Event::MouseButtonDown { x, y, .. } if !app.is_active() && app.area().contains(x, y) => {
                    match MicInput::open(&pa, &settings.audio).and_then(|input| app.activate(Box::new(input))) {
                        Ok(()) => {
                            if let Err(e) = canvas.window_mut().set_title(TITLE) {
                                warn!("setting window title: {}", e);
                            }
                        }
                        Err(e) => {
                            error!("could not start audio capture: {}", e);
                            let msg = format!("Could not start audio capture:\n{}", e);
                            if let Err(e) = show_simple_message_box(MessageBoxFlag::ERROR, TITLE, &msg, canvas.window()) {
                                warn!("showing message box: {:?}", e);
                            }
                        }
                    }
                }
                Event::Window { win_event: WindowEvent::SizeChanged(..), .. } => {
                    app.resize(output_bounds(&canvas)?);
                }
                _ => (),
            }
        }

        let drawn = profiled(|| {
            app.tick();
            renderer.render(&mut canvas, &app)
        });
        if let Err(e) = drawn {
            warn!("dropping frame: {}", e);
        }

        let wait = deadline.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }

    if settings.profile {
        hprof::profiler().print_timing();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;

    #[test]
    fn timing_covers_the_last_whole_frame() {
        let settings = crate::config::parse(["specbg", "--fft-size", "256"]).unwrap();
        let mut analyzer = Analyzer::new(&settings.analysis).unwrap();
        let samples = vec![0.25f32; 256];
        for _ in 0 .. 3 {
            profiled(|| {
                analyzer.analyze(&samples);
            });
        }

        let root = hprof::profiler().root();
        let children = root.children.borrow();
        let node = children.iter().find(|c| c.name == "Analyzer::analyze").unwrap();
        assert_eq!(node.calls.get(), 1);
        assert_eq!(node.recursion.get(), 0);
    }
}
