//! Custom actions for the Catalog actor.

/// Catalog operations beyond CRUD.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Takes a product on or off the menu. Returns the availability now in effect.
    SetAvailability(bool),
}
