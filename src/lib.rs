// Library surface for the binary and the integration tests.
pub mod alerts;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod display;
pub mod fsm;
pub mod keymap;
pub mod logging;
pub mod preferences;
pub mod rounds;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
