//! Terminal admin dashboard for the FANTA-VENGERS fantasy league.

pub mod api;
pub mod config;
pub mod demo;
pub mod forms;
pub mod http_client;
pub mod leaderboard;
pub mod logging;
pub mod state;
pub mod sync;
pub mod ui;
