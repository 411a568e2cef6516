use crate::error::Result;

/// Where encoded tables live. Locations are plain names such as
/// `person.yml`; backends decide how they map to real storage.
pub trait Storage: Send + Sync {
    fn exists(&self, location: &str) -> Result<bool>;

    /// Full contents at `location`, or `None` if nothing has been written.
    fn read(&self, location: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the contents at `location`, creating it if absent.
    fn write(&self, location: &str, bytes: &[u8]) -> Result<()>;
}
