mod config;
mod error;
mod frame;
mod params;
mod registers;
mod status;
