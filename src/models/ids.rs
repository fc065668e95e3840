use super::menu::MenuTree;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

fn random_hex() -> String {
    let mut buf = [0u8; 6];
    // A failed entropy read still leaves the counter suffix unique per session.
    if getrandom::getrandom(&mut buf).is_err() {
        buf = [0; 6];
    }
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn make_menu_item_id(rand_hex: &str, seq: u64) -> String {
    format!("menu-{rand_hex}-{seq}")
}

/// A new id that does not occur anywhere in `tree`.
pub(crate) fn fresh_menu_item_id(tree: &MenuTree) -> String {
    fresh_id_avoiding(|id| tree.contains(id))
}

/// Draws ids until one is not `taken`.
pub(crate) fn fresh_id_avoiding(mut taken: impl FnMut(&str) -> bool) -> String {
    loop {
        let id = make_menu_item_id(&random_hex(), COUNTER.fetch_add(1, Ordering::SeqCst));
        if !taken(&id) {
            return id;
        }
    }
}
