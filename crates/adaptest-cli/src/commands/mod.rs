pub mod convert;
pub mod estimate;
pub mod init;
pub mod next;
pub mod simulate;
pub mod validate;
