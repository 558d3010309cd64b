use uuid::Uuid;

/// Request header carrying the idempotency token.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Supplies a fresh token for every idempotent call.
pub trait IdempotencyTokenProvider: Send + Sync {
    fn next_token(&self) -> String;
}

/// Random UUID v4 tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenProvider;

impl IdempotencyTokenProvider for UuidTokenProvider {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
