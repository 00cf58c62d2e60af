pub mod app_command;
pub mod form_command;

pub use app_command::AppCommand;
pub use form_command::FormCommand;
