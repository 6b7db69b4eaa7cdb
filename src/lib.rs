pub mod action;
pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod event;
pub mod input;
pub mod kinds;
pub mod listing;
pub mod nav;
pub mod session;
pub mod theme;
pub mod tui;
pub mod widgets;
pub mod worker;
