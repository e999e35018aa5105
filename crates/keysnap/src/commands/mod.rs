pub mod check_config;

#[cfg(windows)]
pub mod daemon;
#[cfg(windows)]
pub mod debug;
#[cfg(windows)]
pub mod reset_marks;
#[cfg(windows)]
pub mod run;
#[cfg(windows)]
pub mod start;
#[cfg(windows)]
pub mod status;
#[cfg(windows)]
pub mod stop;
