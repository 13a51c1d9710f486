//! # POS Session
//!
//! Everything one register session owns: who is selling, what is in the
//! cart, and who is buying.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::{Customer, SessionContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PosSession {
    context: SessionContext,
    cart: Cart,
    customer: Option<Customer>,
}

impl PosSession {
    pub fn new(context: SessionContext) -> Self {
        PosSession {
            context,
            cart: Cart::new(),
            customer: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Attaches a customer to the sale in progress, replacing any previous one.
    pub fn attach_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn detach_customer(&mut self) -> Option<Customer> {
        self.customer.take()
    }

    /// The branch sales are attributed to.
    pub fn branch_id(&self) -> CoreResult<&str> {
        self.context
            .branch_id
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(CoreError::NoBranchAssigned)
    }

    /// Resets the sale in progress: empty cart, no customer.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.customer = None;
    }
}
