// Application state (AppState)

use crate::core::config::Config;
use crate::mailer::dispatcher::Dispatcher;
use crate::store::allocator::PassIdAllocator;
use std::sync::Arc;

/// Shared application state
///
/// Contains the components accessed by request handlers. All fields are
/// wrapped in Arc for efficient cloning across threads; the allocator owns
/// the only handle to the counter file.
#[derive(Clone)]
pub struct AppState {
    /// Pass ID allocator over the durable counter
    pub allocator: Arc<PassIdAllocator>,

    /// Sequential mail dispatcher over the SMTP boundary
    pub dispatcher: Arc<Dispatcher>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, allocator: PassIdAllocator, dispatcher: Dispatcher) -> Self {
        Self {
            allocator: Arc::new(allocator),
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }
}
