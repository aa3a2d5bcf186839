//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: QR rendering, session state, history formatting
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, keyboards, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
