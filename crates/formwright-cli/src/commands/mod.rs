pub mod create;
pub mod edit;
pub mod list;
pub mod preview;
pub mod schema;
pub mod session;
pub mod submit;
