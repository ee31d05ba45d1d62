use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use time::Duration;

use crate::{
    codec::SessionCodec, config::CookieSessionConfig, error::Result, transaction::Transaction,
};

/// Reader/writer-locked session values. Readers overlap, writers are exclusive.
#[derive(Debug, Default)]
pub struct SessionValues {
    inner: RwLock<HashMap<String, String>>,
}

impl SessionValues {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            inner: RwLock::new(values),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    pub fn set(&self, key: String, value: String) {
        self.inner.write().insert(key, value);
    }

    pub fn delete(&self, key: &str) -> Option<String> {
        self.inner.write().remove(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().clone()
    }

    /// Runs `f` while holding the read lock.
    pub(crate) fn with_read<T>(&self, f: impl FnOnce(&HashMap<String, String>) -> T) -> T {
        f(&self.inner.read())
    }
}

#[derive(Debug)]
pub(crate) struct Shared<C> {
    pub(crate) codec: C,
    pub(crate) config: CookieSessionConfig,
}

/// One session's values for the duration of a request, plus the commit that writes them back as
/// a cookie.
#[derive(Debug)]
pub struct SessionHandle<C: SessionCodec> {
    session_id: String,
    expiry: Duration,
    values: SessionValues,
    transaction: Transaction,
    shared: Arc<Shared<C>>,
}

impl<C: SessionCodec> SessionHandle<C> {
    pub(crate) fn new(
        shared: Arc<Shared<C>>,
        transaction: Transaction,
        session_id: String,
        expiry: Duration,
        values: HashMap<String, String>,
    ) -> Self {
        Self {
            session_id,
            expiry,
            values: SessionValues::new(values),
            transaction,
            shared,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.set(key.into(), value.into());
    }

    /// Removes `key` and returns the value it held.
    pub fn delete(&self, key: &str) -> Option<String> {
        self.values.delete(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.values.snapshot()
    }

    /// Empties the session and commits the empty state. The values stay cleared even when the
    /// commit fails.
    pub fn flush(&self) -> Result<()> {
        self.values.clear();
        self.save()
    }

    /// Encodes the values and writes them as a fresh cookie.
    ///
    /// # Errors
    ///
    /// Returns the codec's error unchanged; no cookie is written in that case. A transaction
    /// without a response is not an error.
    pub fn save(&self) -> Result<()> {
        self.values.with_read(|values| -> Result<()> {
            let token = self.shared.codec.encode(&self.session_id, values)?;
            let cookie = self.shared.config.build_cookie(token, self.expiry);

            let Some(response) = self.transaction.response() else {
                tracing::debug!(
                    session_id = %self.session_id,
                    "no response available, skipping session commit"
                );
                return Ok(());
            };

            response.set_cookie(cookie);
            Ok(())
        })
    }
}
