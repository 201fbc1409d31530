pub mod prediction;
pub mod schedule;
pub mod similar;
