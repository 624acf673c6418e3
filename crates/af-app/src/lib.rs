/// Command-line front end for clasSCII: config resolution, the current
/// conversion slot, config hot-reload and terminal output.

pub mod cli;
pub mod hotreload;
pub mod session;
pub mod terminal;
