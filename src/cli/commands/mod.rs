mod command_result;
pub mod generate;
pub mod init;
pub mod watch;

pub use command_result::*;
