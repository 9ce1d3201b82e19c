pub mod credentials;
pub mod extract;
pub mod handlers;
pub mod service;
