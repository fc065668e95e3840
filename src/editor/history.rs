use crate::models::MenuTree;

const MAX_UNDO: usize = 50;

/// Snapshot-based undo for the admin tree editor.
///
/// Trees share unchanged subtrees, so keeping whole snapshots stays cheap.
#[derive(Clone, Debug, Default)]
pub(crate) struct EditHistory {
    undo: Vec<MenuTree>,
}

impl EditHistory {
    /// Remember `before` unless the edit that produced `after` changed nothing.
    pub fn record(&mut self, before: &MenuTree, after: &MenuTree) {
        if before == after {
            return;
        }
        self.undo.push(before.clone());
        if self.undo.len() > MAX_UNDO {
            self.undo.remove(0);
        }
    }

    pub fn undo(&mut self) -> Option<MenuTree> {
        self.undo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ops::{add_root, update_field, MenuField};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_undo_restores_previous_tree() {
        let mut history = EditHistory::default();
        let t0 = MenuTree::default();
        let t1 = add_root(&t0);
        history.record(&t0, &t1);
        let id = t1.roots()[0].id.clone();
        let t2 = update_field(&t1, &id, MenuField::Label, "Home");
        history.record(&t1, &t2);

        assert_eq!(history.undo(), Some(t1));
        assert_eq!(history.undo(), Some(t0));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_noop_edits_are_not_recorded() {
        let mut history = EditHistory::default();
        let t0 = add_root(&MenuTree::default());
        let same = update_field(&t0, "missing", MenuField::Label, "x");
        history.record(&t0, &same);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = EditHistory::default();
        let mut tree = MenuTree::default();
        for _ in 0..(MAX_UNDO + 10) {
            let next = add_root(&tree);
            history.record(&tree, &next);
            tree = next;
        }
        let mut count = 0;
        while history.undo().is_some() {
            count += 1;
        }
        assert_eq!(count, MAX_UNDO);
        history.clear();
        assert!(!history.can_undo());
    }
}
