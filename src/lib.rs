pub mod config;
pub mod io;
pub mod logging;
pub mod profile;
pub mod time_util;
