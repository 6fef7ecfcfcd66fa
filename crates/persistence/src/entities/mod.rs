//! Entity definitions (database row mappings).

pub mod device;
pub mod device_data;
pub mod device_group;
pub mod member;
pub mod password_reset;
pub mod session;

pub use device::DeviceEntity;
pub use device_data::DeviceDataEntity;
pub use device_group::DeviceGroupEntity;
pub use member::MemberEntity;
pub use password_reset::PasswordResetTokenEntity;
pub use session::SessionEntity;
