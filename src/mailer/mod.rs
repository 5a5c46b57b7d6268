pub mod composer;
pub mod dispatcher;
pub mod transport;
