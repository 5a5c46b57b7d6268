pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod state;
    pub mod tracing_init;
}

pub mod handlers;
pub mod mailer;
pub mod models;
pub mod store;
pub mod validation;
