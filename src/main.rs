use winit::event_loop::{ControlFlow, EventLoop};

use procedural_backdrops::app::App;
use procedural_backdrops::config::Settings;
use procedural_backdrops::error::BackdropError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BackdropError> {
    // Bad tunables are fatal here, never mid-loop
    let settings = Settings::from_env()?;

    log::info!("Automaton Field + Topographic Contours");
    log::info!("=======================================");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
