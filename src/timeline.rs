pub(crate) mod config;
pub(crate) mod display;
pub(crate) mod engine;
pub(crate) mod stages;
