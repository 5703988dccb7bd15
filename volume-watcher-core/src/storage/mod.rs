pub mod settings_store;
pub mod shared_settings;
