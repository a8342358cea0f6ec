//! Identifier generation

/// Produces fresh, globally unique entity identifiers.
///
/// Injected into stores so tests can hand out fixed identifiers.
pub trait IdProvider: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
