pub mod entry;
pub mod session;
