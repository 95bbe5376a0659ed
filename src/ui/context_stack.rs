use crate::error::PolyviewError;
use crate::host::Host;

/// UI callback run once per loop iteration with the host and the egui
/// context it should build into.
pub type UiCallback = Box<dyn FnMut(&mut Host, &egui::Context)>;

/// One level of the modal stack.
struct ContextEntry {
    id: u64,
    ctx: egui::Context,
    callback: Option<UiCallback>,
}

/// Stack of isolated egui contexts, one per active modal level.
///
/// Entry 0 is the root dashboard and has no callback; the stack is never
/// empty. Every context shares one set of font definitions and the host
/// style, but each keeps its own texture atlas, so painters must key GPU
/// texture state by entry id and drop it once the id is retired.
pub struct ContextStack {
    entries: Vec<ContextEntry>,
    fonts: egui::FontDefinitions,
    next_id: u64,
    retired: Vec<u64>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new(egui::FontDefinitions::default())
    }
}

impl ContextStack {
    /// Create the stack with its root context.
    #[must_use]
    pub fn new(fonts: egui::FontDefinitions) -> Self {
        let mut stack = Self {
            entries: Vec::new(),
            fonts,
            next_id: 0,
            retired: Vec::new(),
        };
        let root = stack.create_context();
        stack.entries.push(ContextEntry {
            id: 0,
            ctx: root,
            callback: None,
        });
        stack
    }

    fn create_context(&self) -> egui::Context {
        let ctx = egui::Context::default();
        ctx.set_fonts(self.fonts.clone());
        ctx.style_mut(super::style::apply);
        ctx
    }

    /// Number of entries, root included. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of active modal levels above the root.
    #[must_use]
    pub fn modal_depth(&self) -> usize {
        self.entries.len() - 1
    }

    /// The context UI should currently be built into.
    #[must_use]
    pub fn current(&self) -> &egui::Context {
        // The root entry is never popped.
        &self.entries[self.entries.len() - 1].ctx
    }

    /// Id of the top entry.
    #[must_use]
    pub fn top_id(&self) -> u64 {
        self.entries[self.entries.len() - 1].id
    }

    /// Push a new context running `callback`. Returns its entry id.
    pub fn push(&mut self, callback: UiCallback) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        let ctx = self.create_context();
        self.entries.push(ContextEntry {
            id,
            ctx,
            callback: Some(callback),
        });
        id
    }

    /// Pop the top entry.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::PopRootContext`] when only the root remains; the
    /// stack is left unchanged.
    pub fn pop(&mut self) -> Result<(), PolyviewError> {
        if self.entries.len() <= 1 {
            return Err(PolyviewError::PopRootContext);
        }
        if let Some(entry) = self.entries.pop() {
            self.retired.push(entry.id);
        }
        Ok(())
    }

    /// Drop entries until at most `len` remain (never the root).
    pub fn truncate(&mut self, len: usize) {
        let keep = len.max(1);
        if self.entries.len() > keep {
            self.retired
                .extend(self.entries.drain(keep..).map(|entry| entry.id));
        }
    }

    /// Ids of entries popped or truncated since the last call.
    pub fn take_retired(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.retired)
    }

    /// Take the top entry's callback out so it can run with `&mut Host`.
    pub fn take_top_callback(&mut self) -> Option<(u64, UiCallback)> {
        let top = self.entries.last_mut()?;
        top.callback.take().map(|cb| (top.id, cb))
    }

    /// Put a callback back into entry `id`, if that entry still exists.
    /// Otherwise the callback is dropped.
    pub fn restore_callback(&mut self, id: u64, callback: UiCallback) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.callback = Some(callback);
        }
    }

    /// Whether an entry with this id is on the stack.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}
