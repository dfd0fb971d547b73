#![forbid(unsafe_code)]

//! bindkit demo binary entry point.

use std::time::Duration;

use bindkit_demo::{DemoApp, Opts};
use bindkit_runtime::{MainLoop, RuntimeConfig};
use time::OffsetDateTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let opts = Opts::parse();

    let parsed = RuntimeConfig::from_env_with_diagnostics();
    for error in &parsed.errors {
        warn!(%error, "ignoring invalid runtime setting");
    }
    let main_loop = MainLoop::with_config(parsed.config);

    let today = OffsetDateTime::now_utc().date();
    let mut app = DemoApp::new(&opts, today);
    println!("{}", app.render_field());
    println!("{}", app.render_calendar());

    app.schedule_rename(&main_loop, Duration::from_millis(opts.delay_ms), opts.rename.clone());
    let fired = main_loop.run_until_idle();
    info!(fired, "deferred work finished");
    println!("{}", app.render_field());

    let year = opts.year.unwrap_or(today.year() + 1);
    if app.calendar.change_year(year) {
        println!("{}", app.render_calendar());
    }
}
