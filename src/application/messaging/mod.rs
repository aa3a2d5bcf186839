//! Message handling - Event-driven message processing

pub mod callback;
pub mod dispatcher;
pub mod keyboards;
pub mod parser;
pub mod texts;

pub use callback::CallbackAction;
pub use dispatcher::{Dispatcher, DispatcherSettings};
pub use parser::MessageParser;
