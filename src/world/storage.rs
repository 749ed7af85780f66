//! Persistent key-value storage for scripted flags and counters.
//! Values are JSON so scripted content can store whatever it likes; the save
//! system (out of scope here) serializes the map wholesale.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

#[derive(Clone, Default)]
pub struct Storage {
    state: Rc<RefCell<HashMap<String, Value>>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: Value) {
        self.state.borrow_mut().insert(key.to_owned(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.borrow().get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.state.borrow().get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().contains_key(key)
    }

    pub fn clear(&self) {
        self.state.borrow_mut().clear();
    }
}
