mod accordion;
mod dropdown;
mod href;

pub use accordion::AccordionNav;
pub use dropdown::DropdownNav;
pub(crate) use href::{is_same_page, route_path, HrefKind};
