pub mod clipboard;
pub mod entry;
pub mod opener;
pub mod operations;
