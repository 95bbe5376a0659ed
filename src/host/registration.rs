//! Structure registration, lookup, and removal on the host.

use super::Host;
use crate::error::PolyviewError;
use crate::structure::{
    GlobalExtents, Rejected, Structure, StructureId, StructureKey,
};

impl Host {
    /// Register a structure.
    ///
    /// With `replace_if_present`, an existing structure with the same type
    /// and name is removed first. On success the extents are recomputed, a
    /// redraw is requested, and the structure receives its pick range.
    ///
    /// # Errors
    ///
    /// [`Rejected`] with [`PolyviewError::DuplicateStructure`] when the name
    /// is taken and `replace_if_present` is false. The structure is handed
    /// back and the registry is unchanged.
    pub fn register_structure(
        &mut self,
        structure: Box<dyn Structure>,
        replace_if_present: bool,
    ) -> Result<StructureId, Rejected> {
        let key = structure.key();
        if replace_if_present
            && self.registry.contains(&key.type_name, &key.name)
        {
            let _ = self.remove_structure(&key.type_name, &key.name, false);
        }
        let pick_count = structure.pick_element_count();
        let id = self.registry.insert(structure).inspect_err(|rejected| {
            self.report(&rejected.error);
        })?;

        if pick_count > 0 {
            self.assign_pick_range(id, &key, pick_count);
        }
        self.update_structure_extents();
        self.scheduler.request_redraw();
        log::debug!(
            "{}registered {}: {}",
            self.options.print_prefix,
            key.type_name,
            key.name
        );
        Ok(id)
    }

    fn assign_pick_range(
        &mut self,
        id: StructureId,
        key: &StructureKey,
        count: u64,
    ) {
        let Some(start) = self.pick_map.allocate(id, count) else {
            self.warning(
                "pick index space exhausted",
                &format!("{}: {} is not pickable", key.type_name, key.name),
            );
            return;
        };
        if let Ok(structure) = self.registry.get_mut(&key.type_name, &key.name)
        {
            structure.set_pick_range(start);
        }
    }

    /// Whether a structure with this type and name is registered.
    #[must_use]
    pub fn has_structure(&self, type_name: &str, name: &str) -> bool {
        self.registry.contains(type_name, name)
    }

    /// Look up a structure. An empty `name` selects the only instance of
    /// `type_name`.
    ///
    /// # Errors
    ///
    /// Lookup errors from [`crate::structure::StructureRegistry::get`].
    pub fn get_structure(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&(dyn Structure + 'static), PolyviewError> {
        self.registry
            .get(type_name, name)
            .inspect_err(|e| self.report(e))
    }

    /// Mutable structure lookup. Requests a redraw.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_structure`].
    pub fn get_structure_mut(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Result<&mut (dyn Structure + 'static), PolyviewError> {
        self.scheduler.request_redraw();
        match self.registry.get_mut(type_name, name) {
            Ok(structure) => Ok(structure),
            Err(e) => {
                if self.options.verbosity > 0 {
                    log::error!("{}{e}", self.options.print_prefix);
                }
                Err(e)
            }
        }
    }

    /// Typed lookup.
    ///
    /// # Errors
    ///
    /// Lookup errors, or [`PolyviewError::WrongType`] when the structure is
    /// not a `T`.
    pub fn get_structure_as<T: Structure + 'static>(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&T, PolyviewError> {
        self.registry
            .get_as::<T>(type_name, name)
            .inspect_err(|e| self.report(e))
    }

    /// Mutable typed lookup. Requests a redraw.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_structure_as`].
    pub fn get_structure_as_mut<T: Structure + 'static>(
        &mut self,
        type_name: &str,
        name: &str,
    ) -> Result<&mut T, PolyviewError> {
        self.scheduler.request_redraw();
        match self.registry.get_as_mut::<T>(type_name, name) {
            Ok(structure) => Ok(structure),
            Err(e) => {
                if self.options.verbosity > 0 {
                    log::error!("{}{e}", self.options.print_prefix);
                }
                Err(e)
            }
        }
    }

    /// Remove a structure by type and name.
    ///
    /// Clears the pick selection if it points at the structure, releases
    /// its pick range, drops it, and recomputes the extents.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::StructureNotFound`] when absent and
    /// `error_if_absent`; otherwise absence is silently ignored.
    pub fn remove_structure(
        &mut self,
        type_name: &str,
        name: &str,
        error_if_absent: bool,
    ) -> Result<(), PolyviewError> {
        let id = if self.registry.contains(type_name, name) {
            self.registry.id_of(type_name, name).ok()
        } else {
            None
        };
        let Some(id) = id else {
            if !error_if_absent {
                return Ok(());
            }
            let err = PolyviewError::StructureNotFound {
                type_name: type_name.to_owned(),
                name: name.to_owned(),
            };
            self.report(&err);
            return Err(err);
        };

        if self.pick.clear_if_selected(id) {
            log::debug!(
                "{}selection cleared by removal",
                self.options.print_prefix
            );
        }
        self.pick_map.release(id);
        let _ = self.registry.remove(type_name, name);
        self.update_structure_extents();
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Remove the single structure named `name`, whatever its type.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NoStructureNamed`] when nothing matches,
    /// [`PolyviewError::AmbiguousName`] when several types match. Nothing
    /// is removed in either case.
    pub fn remove_structure_by_name(
        &mut self,
        name: &str,
    ) -> Result<(), PolyviewError> {
        let key = self
            .registry
            .find_by_name(name)
            .inspect_err(|e| self.report(e))?;
        self.remove_structure(&key.type_name, &key.name, true)
    }

    /// Remove every structure. Type tags stay known.
    pub fn remove_all_structures(&mut self) {
        for key in self.registry.keys() {
            if let Some((id, _)) =
                self.registry.remove(&key.type_name, &key.name)
            {
                self.pick_map.release(id);
            }
        }
        self.pick.reset();
        self.update_structure_extents();
        self.scheduler.request_redraw();
    }

    /// Recompute the global extents from every registered structure.
    pub fn update_structure_extents(&mut self) {
        self.extents = GlobalExtents::from_registry(&self.registry);
    }
}
