mod clean;
mod config;
mod extract;
mod wrap;
