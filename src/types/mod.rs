pub mod device;
pub mod errors;
pub mod meta;
pub mod mount;
pub mod target;

pub use device::*;
pub use errors::*;
pub use meta::*;
pub use mount::*;
pub use target::*;
