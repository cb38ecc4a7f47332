pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{run_server, serve};
pub use tools::{Session, SessionOptions};
