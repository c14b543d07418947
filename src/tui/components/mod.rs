pub mod chart;
pub mod header;
pub mod help;
pub mod logs;
pub mod patients_table;
pub mod stats;
