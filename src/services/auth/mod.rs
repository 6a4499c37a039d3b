pub mod factory;
pub mod session_token;

pub use factory::build_session_decoder;
pub use session_token::{SessionDecoder, UserId};
