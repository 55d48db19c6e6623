use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::ValueError;

use super::value::{PropertyValue, Value};

/// Shared, typed settings value.
///
/// Clones are handles to the same cell: the application keeps one, the schema
/// keeps another, and widgets write back through the erased [`PropertySlot`].
pub struct Property<T> {
    cell: Rc<PropertyCell<T>>,
}

struct PropertyCell<T> {
    value: RefCell<T>,
    revision: Cell<u64>,
}

impl<T: PropertyValue> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(PropertyCell {
                value: RefCell::new(value),
                revision: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.cell.value.borrow_mut() = value;
        self.cell.bump();
    }

    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.cell.value.borrow())
    }

    /// Incremented on every accepted write.
    pub fn revision(&self) -> u64 {
        self.cell.revision.get()
    }

    pub(crate) fn slot(&self) -> Rc<dyn PropertySlot> {
        self.cell.clone()
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.cell.value.borrow())
            .field("revision", &self.cell.revision.get())
            .finish()
    }
}

impl<T> PropertyCell<T> {
    fn bump(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }
}

/// Type-erased access to a property's value.
pub trait PropertySlot {
    fn value(&self) -> Value;

    fn set_value(&self, value: &Value) -> Result<(), ValueError>;

    fn type_name(&self) -> &'static str;

    /// Option labels when the value is an enum.
    fn variants(&self) -> Option<Vec<String>>;

    fn invoke(&self);

    fn revision(&self) -> u64;
}

impl<T: PropertyValue> PropertySlot for PropertyCell<T> {
    fn value(&self) -> Value {
        self.value.borrow().to_value()
    }

    fn set_value(&self, value: &Value) -> Result<(), ValueError> {
        let next = T::from_value(value)?;
        *self.value.borrow_mut() = next;
        self.bump();
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn variants(&self) -> Option<Vec<String>> {
        T::variants()
    }

    fn invoke(&self) {
        // The callback may touch this property; release the borrow first.
        let current = self.value.borrow().clone();
        current.invoke();
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::value::Action;

    #[test]
    fn clones_share_the_same_value() {
        let volume = Property::new(40.0);
        let handle = volume.clone();
        handle.set(55.0);

        assert_eq!(volume.get(), 55.0);
        assert_eq!(volume.revision(), 1);
    }

    #[test]
    fn erased_writes_are_type_checked() {
        let enabled = Property::new(false);
        let slot = enabled.slot();

        assert!(slot.set_value(&Value::Text("yes".to_owned())).is_err());
        assert_eq!(enabled.revision(), 0);

        slot.set_value(&Value::Bool(true)).unwrap();
        assert!(enabled.get());
        assert_eq!(slot.revision(), 1);
    }

    #[test]
    fn actions_can_be_invoked_through_the_slot() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let reset = Property::new(Action::new(move || counter.set(counter.get() + 1)));

        reset.slot().invoke();
        reset.slot().invoke();
        assert_eq!(clicks.get(), 2);
    }
}
