//! Client-side state shared between the form and the results page.
//!
//! Every store holds exactly one value that is replaced as a whole. Readers
//! either take a snapshot or subscribe and get woken on every change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::models::{Attachment, FormRecord, PhotoFeedback, PriceResult};

/// Single-value store backed by a `watch` channel
#[derive(Debug)]
pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the current value, returning the previous one
    pub fn set(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Last submitted form, kept so the form can be restored after the results page
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub record: FormRecord,
    pub attachments: Vec<Attachment>,
    pub saved_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(record: FormRecord, attachments: Vec<Attachment>) -> Self {
        Self {
            record,
            attachments,
            saved_at: Utc::now(),
        }
    }
}

/// All stores of one client session, handed out by dependency injection
#[derive(Debug, Clone, Default)]
pub struct AppStores {
    pub price: Store<PriceResult>,
    pub feedback: Store<PhotoFeedback>,
    pub draft: Store<Option<Draft>>,
}
