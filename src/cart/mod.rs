//! Cart/order state-transition reducer.
//!
//! All cart mutations go through [`apply`], a pure transition function over
//! a tagged command set, so the session state machine is testable without
//! any UI or network harness.

use crate::domain::MenuItem;

/// One selected item. The unit price is captured when the item is first
/// added and never re-read from the catalog afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub mobile: String,
}

/// The in-memory, not-yet-submitted order: selected lines in insertion
/// order, customer draft, and free-form notes. Owned by the active session
/// and reset on successful order placement or explicit clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSession {
    lines: Vec<CartLine>,
    pub customer: CustomerDraft,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub enum CartCommand {
    Add { item: MenuItem },
    SetQuantity { item_id: String, quantity: i32 },
    Remove { item_id: String },
    Clear,
    UpdateCustomer { name: Option<String>, mobile: Option<String> },
    SetNotes { notes: String },
}

/// Pure transition function: `(state, command) -> state`.
pub fn apply(mut state: CartSession, command: CartCommand) -> CartSession {
    match command {
        CartCommand::Add { item } => {
            match state.lines.iter_mut().find(|line| line.item_id == item.id) {
                Some(line) => line.quantity += 1,
                None => state.lines.push(CartLine {
                    item_id: item.id,
                    name: item.name,
                    unit_price: item.price,
                    quantity: 1,
                }),
            }
        }
        CartCommand::SetQuantity { item_id, quantity } => {
            if quantity <= 0 {
                // Dropping below one is removal, not clamping.
                state.lines.retain(|line| line.item_id != item_id);
            } else if let Some(line) = state.lines.iter_mut().find(|l| l.item_id == item_id) {
                line.quantity = quantity as u32;
            }
        }
        CartCommand::Remove { item_id } => {
            state.lines.retain(|line| line.item_id != item_id);
        }
        CartCommand::Clear => {
            state.lines.clear();
            state.customer = CustomerDraft::default();
            state.notes.clear();
        }
        CartCommand::UpdateCustomer { name, mobile } => {
            if let Some(name) = name {
                state.customer.name = name;
            }
            if let Some(mobile) = mobile {
                state.customer.mobile = mobile;
            }
        }
        CartCommand::SetNotes { notes } => {
            state.notes = notes;
        }
    }
    state
}

impl CartSession {
    pub fn dispatch(&mut self, command: CartCommand) {
        let state = std::mem::take(self);
        *self = apply(state, command);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.unit_price * f64::from(line.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
