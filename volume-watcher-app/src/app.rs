use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use volume_watcher_core::{AudioDevice, SettingsStore, SharedSettings, WatchError, Watcher};
use volume_watcher_windows::{alert, ComApartment, DeviceEnumerator, WasapiSessionSource, WindowsLabelResolver};

use crate::commands::{self, Command, HELP};
use crate::console::ConsoleDelegate;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("console input failed: {0}")]
    Io(#[from] io::Error),
}

/// Console session: one watcher plus the device list last shown to the user.
struct App {
    enumerator: DeviceEnumerator,
    settings: Arc<SharedSettings>,
    watcher: Watcher,
    devices: Vec<AudioDevice>,
}

pub fn run() -> Result<(), AppError> {
    let _com = ComApartment::init_multithreaded()?;

    let store = SettingsStore::in_dir(&settings_dir());
    log::info!("Settings file: {}", store.path().display());
    let settings = Arc::new(SharedSettings::load(store));

    let enumerator = DeviceEnumerator::new()?;
    let source = open_saved_device(&enumerator, &settings)?;
    let delegate = ConsoleDelegate::new(Arc::clone(&settings), Box::new(alert::beep_async));

    let watcher = Watcher::new(
        Arc::new(source),
        settings.clone(),
        delegate,
        Arc::new(WindowsLabelResolver),
    )?;

    let mut app = App {
        enumerator,
        settings,
        watcher,
        devices: Vec::new(),
    };
    app.print_status();
    println!("Type \"help\" for a list of commands");
    app.read_commands()
}

/// Next to the executable, like a portable tool, else the user config dir.
fn settings_dir() -> PathBuf {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        return dir;
    }

    let dir = dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("volume-watcher");
    if let Err(e) = fs::create_dir_all(&dir) {
        log::warn!("Could not create {}: {}", dir.display(), e);
    }
    dir
}

fn open_saved_device(
    enumerator: &DeviceEnumerator,
    settings: &SharedSettings,
) -> Result<WasapiSessionSource, WatchError> {
    let saved = settings.device_id();
    if !saved.is_empty() {
        match enumerator.open(&saved) {
            Ok(source) => return Ok(source),
            Err(e) => log::warn!("Saved device unavailable, using the default one: {}", e),
        }
    }
    enumerator.open_default()
}

impl App {
    fn read_commands(&mut self) -> Result<(), AppError> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            self.reap_loop();
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            self.reap_loop();

            match commands::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Exit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.execute(command) {
                        eprintln!("{}", e);
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }

        if let Err(e) = self.watcher.stop() {
            log::warn!("Session watcher ended with an error: {}", e);
        }
        Ok(())
    }

    /// The delegate already reported the error; this only syncs state.
    fn reap_loop(&mut self) {
        if let Some(Err(e)) = self.watcher.poll_exit() {
            log::debug!("Sampling loop ended: {}", e);
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), WatchError> {
        match command {
            Command::Toggle => {
                self.watcher.toggle()?;
            }
            Command::Start => self.watcher.start()?,
            Command::Stop => self.watcher.stop()?,
            Command::SetThreshold(threshold) => {
                self.settings.set_peak_threshold(threshold);
                println!("Peak volume threshold: {}", self.settings.snapshot().peak_threshold);
            }
            Command::SetPollInterval(ms) => {
                self.settings.set_poll_interval_ms(ms);
                println!("Polling rate: {} ms", self.settings.snapshot().poll_interval_ms);
            }
            Command::ListDevices => self.list_devices()?,
            Command::ChangeDevice(index) => self.change_device(index)?,
            Command::SaveDevice => {
                let device = self.watcher.device();
                self.settings.set_device_id(device.id.clone());
                println!("Saved \"{}\" as the default device", device.name);
            }
            Command::ToggleBeep => {
                let enabled = !self.settings.beep_on_mute();
                self.settings.set_beep_on_mute(enabled);
                println!("Beep after mute: {}", on_off(enabled));
            }
            Command::ToggleAutoStart => {
                let enabled = !self.settings.snapshot().auto_start;
                self.settings.set_auto_start(enabled);
                println!("Start watcher automatically: {}", on_off(enabled));
            }
            Command::Status => self.print_status(),
            Command::Help => println!("{}", HELP),
            Command::Exit => {}
        }
        Ok(())
    }

    fn list_devices(&mut self) -> Result<(), WatchError> {
        self.devices = self.enumerator.list_render_devices()?;
        let current = self.watcher.device().id;

        for (i, device) in self.devices.iter().enumerate() {
            let marker = if device.id == current { "*" } else { " " };
            let default = if device.is_default { " (default)" } else { "" };
            println!("{} {:>2}: {} [{}]{}", marker, i, device.name, device.state, default);
        }
        Ok(())
    }

    fn change_device(&mut self, index: usize) -> Result<(), WatchError> {
        if self.devices.is_empty() {
            self.devices = self.enumerator.list_render_devices()?;
        }
        let device = self.devices.get(index).cloned().ok_or_else(|| {
            WatchError::ConfigurationOutOfRange(format!(
                "no device at index {}, run \"cd\" to list devices",
                index
            ))
        })?;
        if !device.is_active() {
            return Err(WatchError::DeviceUnavailable(format!(
                "\"{}\" is {}",
                device.name, device.state
            )));
        }

        let source = self.enumerator.open(&device.id)?;
        let count = self.watcher.set_device(Arc::new(source))?;
        println!("Now watching \"{}\" ({} sessions)", device.name, count);
        Ok(())
    }

    fn print_status(&self) {
        let settings = self.settings.snapshot();
        let device = self.watcher.device();
        println!("Device: {}", device.name);
        println!("Sessions: {}", self.watcher.session_count());
        println!("Peak volume threshold: {}", settings.peak_threshold);
        println!("Polling rate: {} ms", settings.poll_interval_ms);
        println!("Beep after mute: {}", on_off(settings.beep_on_mute));
        println!("Start watcher automatically: {}", on_off(settings.auto_start));
        println!("Session Watcher is {}", self.watcher.state());
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
