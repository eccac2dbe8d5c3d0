pub mod commands;
pub mod modules;

pub use modules::common::error::DebloatError;
pub use modules::common::platform::Platform;
pub use modules::common::settings::Settings;
pub use modules::locator;
pub use modules::process;
pub use modules::service;
pub use modules::startup;
pub use modules::writer;
