pub mod api;
pub mod config;
pub mod deadline;
pub mod errors;
pub mod kanban;
pub mod models;
pub mod normalize;
pub mod session;
