/// A menu item as presented to the operator: the item wire shape joined
/// with its category label. Read-only; the backend owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Category label, `"Uncategorized"` when the item's category id has no
    /// matching category.
    pub category: String,
    pub price: f64,
    pub available: bool,
}
