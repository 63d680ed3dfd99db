pub mod bank_loader;

pub use bank_loader::load_bank;
