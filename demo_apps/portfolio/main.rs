//! Portfolio scene, native window.
//!
//! ```text
//! cargo run -p portfolio -- [path/to/avatar.glb]
//! ```
//!
//! Settings come from the JSON file named by `JOURNEY_SETTINGS`, if set.

use journey::App;
use journey::settings::Settings;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;
    let mut app = App::new(settings).with_title("Journey - Portfolio");
    if let Some(model) = std::env::args().nth(1) {
        log::info!("Using avatar model {model}");
        app = app.with_model(model);
    }

    app.run()?;
    Ok(())
}
