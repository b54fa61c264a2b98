//! Rule hosts. Each module declares its rules in one `rule_host!` block.

pub mod classical;
pub mod release;
pub mod track;
