//! Command handlers, one module per subcommand family.

pub mod decrypt;
pub mod encrypt;
pub mod init;
pub mod keys;
pub mod misc;
pub mod scan;
