mod classifier;
mod common;
mod service;
