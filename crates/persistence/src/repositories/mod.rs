//! Repository implementations for database operations.

pub mod device;
pub mod device_data;
pub mod device_group;
pub mod member;
pub mod password_reset;
pub mod session;

pub use device::DeviceRepository;
pub use device_data::DeviceDataRepository;
pub use device_group::DeviceGroupRepository;
pub use member::MemberRepository;
pub use password_reset::PasswordResetRepository;
pub use session::SessionRepository;
