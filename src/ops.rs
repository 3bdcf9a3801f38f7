pub mod complete_status;
pub mod concat;
pub mod count;
pub mod distinct;
pub mod filter;
pub mod map;
pub mod map_err;
pub mod take;
pub mod tap;
pub mod zip;
