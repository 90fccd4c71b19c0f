pub mod clean;
pub mod extract;
mod helper;
pub mod init;
pub mod wrap;
