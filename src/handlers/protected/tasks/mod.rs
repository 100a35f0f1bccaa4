pub mod create;
pub mod get;
pub mod list;
pub mod remove;
pub mod rpc;
pub mod subscribe;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create;
pub use get::get;
pub use list::list;
pub use remove::remove;
pub use rpc::rpc;
pub use subscribe::subscribe;
pub use update::update;
