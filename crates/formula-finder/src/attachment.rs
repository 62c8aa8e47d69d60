use finder_common::model::AttachedFile;

/// Holds the one spreadsheet the next search runs against.
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    current: Option<AttachedFile>,
}

impl AttachmentSlot {
    /// Keeps the first of `files`, replacing whatever was attached.
    /// An empty pick leaves the slot untouched. Returns whether it changed.
    pub fn select(&mut self, files: impl IntoIterator<Item = AttachedFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => {
                self.current = Some(file);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self) -> Option<AttachedFile> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&AttachedFile> {
        self.current.as_ref()
    }
}
