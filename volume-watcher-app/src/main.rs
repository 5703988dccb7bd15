#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

#[cfg(target_os = "windows")]
mod app;
mod commands;
mod console;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(target_os = "windows")]
    if let Err(e) = app::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    #[cfg(not(target_os = "windows"))]
    {
        log::error!("volume-watcher needs Windows audio sessions");
        std::process::exit(1);
    }
}
