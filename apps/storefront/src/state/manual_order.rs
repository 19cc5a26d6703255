//! # Manual Order State
//!
//! The admin-side order an establishment keys in for a phone or counter
//! customer. Same cart reducer and form rules as the storefront checkout,
//! submitted to the admin endpoint.

use std::sync::{Arc, Mutex, MutexGuard};

use roda_core::{CartAction, CheckoutForm, ManualOrderDraft};

use super::submit::SubmissionFlag;

#[derive(Debug, Clone, Default)]
pub struct ManualOrderState {
    draft: Arc<Mutex<ManualOrderDraft>>,
    submitting: SubmissionFlag,
}

impl ManualOrderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ManualOrderDraft) -> R,
    {
        f(&self.lock())
    }

    /// Applies a cart action to the draft's cart.
    pub fn dispatch(&self, action: CartAction) -> ManualOrderDraft {
        let mut draft = self.lock();
        draft.cart = draft.cart.reduce(action);
        draft.clone()
    }

    pub fn set_form(&self, form: CheckoutForm) -> ManualOrderDraft {
        let mut draft = self.lock();
        draft.form = form;
        draft.clone()
    }

    /// Resets cart and form.
    pub fn reset(&self) {
        let mut draft = self.lock();
        *draft = draft.cleared();
    }

    pub fn snapshot(&self) -> ManualOrderDraft {
        self.lock().clone()
    }

    pub fn submission(&self) -> &SubmissionFlag {
        &self.submitting
    }

    fn lock(&self) -> MutexGuard<'_, ManualOrderDraft> {
        self.draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
