//! Domain model definitions.

pub mod device;
pub mod device_data;
pub mod device_group;
pub mod member;

pub use member::Member;
