pub mod color;
pub mod console;
pub mod console_backend;

pub use console::Console;
pub use console_backend::{ConsoleBackend, ConsoleReply};
