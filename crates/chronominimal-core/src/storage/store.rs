use crate::error::{CoreError, Result};

/// Somewhere the serialized timer state can be read from and written to.
///
/// Implementations hold exactly one blob; the codec lives in
/// [`super::state`].
pub trait StateStore {
    /// Read the stored blob, `None` when nothing was ever written.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored blob.
    fn save(&mut self, blob: &str) -> Result<()>;
}

/// In-memory store, optionally failing on read or write.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub value: Option<String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Number of successful writes.
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(CoreError::Io(std::io::Error::other("read refused")));
        }
        Ok(self.value.clone())
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        if self.fail_writes {
            return Err(CoreError::Io(std::io::Error::other("quota exceeded")));
        }
        self.value = Some(blob.to_string());
        self.writes += 1;
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        (**self).save(blob)
    }
}
