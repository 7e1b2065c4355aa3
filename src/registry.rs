use crate::error::VehicleError;
use std::collections::HashSet;

/// Keeps track of every vehicle name handed out in a session.
///
/// A registry is owned by whoever builds the vehicles (usually the caller that
/// later creates the race). Names stay reserved until `clear()` is called or
/// the registry is dropped, so two vehicles built from the same registry can
/// never share a name.
#[derive(Debug, Default)]
pub struct VehicleRegistry {
    names: HashSet<String>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// Reserves `name`, failing if it was already taken.
    pub fn register(&mut self, name: &str) -> Result<(), VehicleError> {
        if !self.names.insert(String::from(name)) {
            return Err(VehicleError::DuplicateName(String::from(name)));
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Releases every reserved name
    pub fn clear(&mut self) {
        self.names.clear();
    }
}
