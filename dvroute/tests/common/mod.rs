#![allow(dead_code)]

pub mod graphs;
pub mod reference;
pub mod virtual_network;

use simplelog::{Config, LevelFilter, TestLogger};

pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Info, Config::default());
}
