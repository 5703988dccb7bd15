pub mod label_resolver;
pub mod session_source;
pub mod settings_provider;
pub mod watch_delegate;
