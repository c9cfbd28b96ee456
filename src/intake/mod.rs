pub mod mapping;
pub mod normalizer;
pub mod webhook;

pub use mapping::InboundSource;
pub use normalizer::normalize;
pub use webhook::{handle_webhook, WEBHOOK_PREFIX};
