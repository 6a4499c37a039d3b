/// Factory: build `SessionDecoder` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::SessionDecoder;

pub fn build_session_decoder(config: &Config) -> Arc<SessionDecoder> {
    let decoder = match config.auth_jwt_secret.as_deref() {
        Some(secret) => SessionDecoder::hs256(secret.as_bytes()),
        None => {
            tracing::warn!(
                "AUTH_JWT_SECRET is not set; session token signatures are not verified"
            );
            SessionDecoder::unverified()
        }
    };

    Arc::new(decoder)
}
