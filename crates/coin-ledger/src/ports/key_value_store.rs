//! Port for the durable key-value slot backing the ledger.
//!
//! The ledger keeps its whole user-to-account mapping in a single named slot
//! and rewrites it in full on every mutation. Adapters only need to move
//! opaque bytes in and out; serialisation stays in the domain.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// Reading or writing the slot failed.
        Io {
            /// Adapter-specific failure description.
            message: String,
        } => "store i/o failed: {message}",
        /// The adapter cannot address the requested key.
        InvalidKey {
            /// The rejected key.
            key: String,
        } => "invalid store key: {key}",
    }
}

/// Durable byte storage addressed by string keys.
///
/// `get` returns `Ok(None)` for a key that has never been written. `set`
/// replaces any previous value for the key in full.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyValueStoreError>;

    /// Replace the bytes stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn io_error_formats_message() {
        let err = KeyValueStoreError::io("permission denied");
        assert_eq!(err.to_string(), "store i/o failed: permission denied");
    }

    #[rstest]
    fn invalid_key_error_names_key() {
        let err = KeyValueStoreError::invalid_key("../coins");
        assert_eq!(err.to_string(), "invalid store key: ../coins");
    }

    #[rstest]
    fn mock_store_can_stand_in_for_the_port() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .withf(|key: &str| key == "slot")
            .times(1)
            .return_once(|_| Ok(Some(b"{}".to_vec())));

        let value = store.get("slot").expect("mock get succeeds");
        assert_eq!(value.as_deref(), Some(b"{}".as_slice()));
    }
}
