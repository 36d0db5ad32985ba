pub mod alphabet;
pub mod charset;
pub mod config;
pub mod offset_table;
pub mod oracle;
