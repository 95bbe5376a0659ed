use std::collections::BTreeMap;
use std::fmt;

use super::{Structure, StructureId, StructureKey};
use crate::error::PolyviewError;

/// A registered structure together with its registry-assigned id.
struct Entry {
    id: StructureId,
    structure: Box<dyn Structure>,
}

/// A failed registration: the error and the structure handed back to the
/// caller, untouched.
pub struct Rejected {
    /// Why the registration failed.
    pub error: PolyviewError,
    /// The structure that was not registered.
    pub structure: Box<dyn Structure>,
}

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .field("type_name", &self.structure.type_name())
            .field("name", &self.structure.name())
            .finish()
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl From<Rejected> for PolyviewError {
    fn from(rejected: Rejected) -> Self {
        rejected.error
    }
}

/// Owns every registered structure, keyed by type tag then instance name.
///
/// Both levels are ordered so drawing and UI iterate alphabetically. A type
/// tag stays known once declared or first registered, even after its last
/// instance is removed.
#[derive(Default)]
pub struct StructureRegistry {
    types: BTreeMap<String, BTreeMap<String, Entry>>,
    next_id: u64,
}

impl StructureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `type_name` known without registering an instance.
    pub fn declare_type(&mut self, type_name: &str) {
        let _ = self.types.entry(type_name.to_owned()).or_default();
    }

    /// Insert a structure. Fails without touching the registry when the
    /// `(type, name)` pair is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] carrying [`PolyviewError::DuplicateStructure`]
    /// and the structure itself.
    pub fn insert(
        &mut self,
        structure: Box<dyn Structure>,
    ) -> Result<StructureId, Rejected> {
        if self.contains(structure.type_name(), structure.name()) {
            return Err(Rejected {
                error: PolyviewError::DuplicateStructure {
                    type_name: structure.type_name().to_owned(),
                    name: structure.name().to_owned(),
                },
                structure,
            });
        }
        self.next_id += 1;
        let id = StructureId(self.next_id);
        let _ = self
            .types
            .entry(structure.type_name().to_owned())
            .or_default()
            .insert(structure.name().to_owned(), Entry { id, structure });
        Ok(id)
    }

    /// Whether a structure with this type and name is registered.
    #[must_use]
    pub fn contains(&self, type_name: &str, name: &str) -> bool {
        self.types
            .get(type_name)
            .is_some_and(|instances| instances.contains_key(name))
    }

    /// Total number of registered structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(BTreeMap::len).sum()
    }

    /// Whether no structures are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.values().all(BTreeMap::is_empty)
    }

    /// Number of instances registered under `type_name`.
    #[must_use]
    pub fn count_of_type(&self, type_name: &str) -> usize {
        self.types.get(type_name).map_or(0, BTreeMap::len)
    }

    /// All known type tags, in order, including empty ones.
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    /// Snapshot of every registered key, in drawing order.
    #[must_use]
    pub fn keys(&self) -> Vec<StructureKey> {
        self.types
            .iter()
            .flat_map(|(type_name, instances)| {
                instances
                    .keys()
                    .map(|name| StructureKey::new(type_name, name))
            })
            .collect()
    }

    /// Resolve a user lookup to a concrete instance name. An empty `name`
    /// selects the single instance of `type_name`.
    fn resolve_name<'a>(
        &'a self,
        type_name: &str,
        name: &'a str,
    ) -> Result<&'a str, PolyviewError> {
        let instances = self.types.get(type_name).ok_or_else(|| {
            PolyviewError::UnknownType {
                type_name: type_name.to_owned(),
            }
        })?;
        if name.is_empty() {
            return match instances.keys().next() {
                Some(only) if instances.len() == 1 => Ok(only.as_str()),
                _ => Err(PolyviewError::AmbiguousLookup {
                    type_name: type_name.to_owned(),
                    count: instances.len(),
                }),
            };
        }
        if instances.contains_key(name) {
            Ok(name)
        } else {
            Err(PolyviewError::StructureNotFound {
                type_name: type_name.to_owned(),
                name: name.to_owned(),
            })
        }
    }

    fn entry(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&Entry, PolyviewError> {
        let resolved = self.resolve_name(type_name, name)?.to_owned();
        self.types
            .get(type_name)
            .and_then(|instances| instances.get(&resolved))
            .ok_or_else(|| PolyviewError::StructureNotFound {
                type_name: type_name.to_owned(),
                name: resolved,
            })
    }

    fn entry_mut(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Result<&mut Entry, PolyviewError> {
        let resolved = self.resolve_name(type_name, name)?.to_owned();
        self.types
            .get_mut(type_name)
            .and_then(|instances| instances.get_mut(&resolved))
            .ok_or_else(|| PolyviewError::StructureNotFound {
                type_name: type_name.to_owned(),
                name: resolved,
            })
    }

    /// Look up a structure. An empty `name` succeeds only when exactly one
    /// instance of `type_name` exists.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::UnknownType`], [`PolyviewError::AmbiguousLookup`],
    /// or [`PolyviewError::StructureNotFound`].
    pub fn get(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&(dyn Structure + 'static), PolyviewError> {
        self.entry(type_name, name).map(|e| e.structure.as_ref())
    }

    /// Mutable variant of [`Self::get`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub fn get_mut(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Result<&mut (dyn Structure + 'static), PolyviewError> {
        self.entry_mut(type_name, name)
            .map(|e| e.structure.as_mut())
    }

    /// Id of a registered structure.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub fn id_of(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<StructureId, PolyviewError> {
        self.entry(type_name, name).map(|e| e.id)
    }

    /// Typed lookup: the structure downcast to `T`.
    ///
    /// # Errors
    ///
    /// Lookup errors as in [`Self::get`], or [`PolyviewError::WrongType`]
    /// when the structure is not a `T`.
    pub fn get_as<T: Structure + 'static>(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&T, PolyviewError> {
        let structure = self.get(type_name, name)?;
        structure.as_any().downcast_ref::<T>().ok_or_else(|| {
            PolyviewError::WrongType {
                type_name: structure.type_name().to_owned(),
                name: structure.name().to_owned(),
                expected: std::any::type_name::<T>(),
            }
        })
    }

    /// Mutable variant of [`Self::get_as`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_as`].
    pub fn get_as_mut<T: Structure + 'static>(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Result<&mut T, PolyviewError> {
        let structure = self.get_mut(type_name, name)?;
        let (type_name, name) =
            (structure.type_name().to_owned(), structure.name().to_owned());
        structure.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
            PolyviewError::WrongType {
                type_name,
                name,
                expected: std::any::type_name::<T>(),
            }
        })
    }

    /// Find the unique key whose instance name is `name` across all types.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NoStructureNamed`] when nothing matches,
    /// [`PolyviewError::AmbiguousName`] when several types match.
    pub fn find_by_name(
        &self,
        name: &str,
    ) -> Result<StructureKey, PolyviewError> {
        let mut matches = self
            .types
            .iter()
            .filter(|(_, instances)| instances.contains_key(name))
            .map(|(type_name, _)| type_name);
        let first = matches.next().ok_or_else(|| {
            PolyviewError::NoStructureNamed {
                name: name.to_owned(),
            }
        })?;
        if let Some(second) = matches.next() {
            return Err(PolyviewError::AmbiguousName {
                name: name.to_owned(),
                first_type: first.clone(),
                second_type: second.clone(),
            });
        }
        Ok(StructureKey::new(first, name))
    }

    /// Remove and return a structure by exact key.
    pub fn remove(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Option<(StructureId, Box<dyn Structure>)> {
        self.types
            .get_mut(type_name)
            .and_then(|instances| instances.remove(name))
            .map(|entry| (entry.id, entry.structure))
    }

    /// Every registered structure, in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Structure + 'static)> {
        self.types
            .values()
            .flat_map(BTreeMap::values)
            .map(|e| e.structure.as_ref())
    }

    /// Every registered structure with its id, mutably, in drawing order.
    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (StructureId, &mut (dyn Structure + 'static))>
    {
        self.types
            .values_mut()
            .flat_map(BTreeMap::values_mut)
            .map(|e| (e.id, e.structure.as_mut()))
    }

    /// Instances of one type, mutably, in name order.
    pub fn instances_of_type_mut(
        &mut self,
        type_name: &str,
    ) -> impl Iterator<Item = &mut (dyn Structure + 'static)> {
        self.types
            .get_mut(type_name)
            .into_iter()
            .flat_map(BTreeMap::values_mut)
            .map(|e| e.structure.as_mut())
    }

    /// Find a structure by id.
    pub fn by_id_mut(
        &mut self,
        id: StructureId,
    ) -> Option<&mut (dyn Structure + 'static)> {
        self.iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, s)| s)
    }
}
