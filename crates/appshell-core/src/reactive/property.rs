//! Property - observable value cell

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::subject::{Observable, Subject};

/// A value cell that emits on its `changed` stream whenever it is written.
///
/// Cloning a `Property` yields another handle to the same value.
pub struct Property<T: 'static> {
	value: Rc<RefCell<T>>,
	changed: Subject<T>,
}

impl<T: 'static> Clone for Property<T> {
	fn clone(&self) -> Self {
		Self {
			value: self.value.clone(),
			changed: self.changed.clone(),
		}
	}
}

impl<T: Default + 'static> Default for Property<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Property<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Property")
			.field("value", &*self.value.borrow())
			.finish()
	}
}

impl<T: 'static> Property<T> {
	/// Creates a property holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(value)),
			changed: Subject::new(),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Reads a snapshot of the current value.
	///
	/// `f` sees a copy, so it may read or write this property.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R
	where
		T: Clone,
	{
		let snapshot = self.get();
		f(&snapshot)
	}

	/// Stores `value` and announces it.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.value.borrow_mut() = value.clone();
		self.changed.next(value);
	}

	/// Stores `value` only if it differs from the current one.
	///
	/// Returns `true` if the value changed.
	pub fn set_if_changed(&self, value: T) -> bool
	where
		T: Clone + PartialEq,
	{
		if *self.value.borrow() == value {
			return false;
		}
		self.set(value);
		true
	}

	/// Applies `f` to the value and announces the result.
	///
	/// `f` works on a copy that is stored once it returns, so it may read
	/// this property (seeing the old value).
	pub fn update(&self, f: impl FnOnce(&mut T))
	where
		T: Clone,
	{
		let mut value = self.get();
		f(&mut value);
		self.set(value);
	}

	/// Stream of every value written after subscription.
	pub fn changed(&self) -> Observable<T> {
		self.changed.as_observable()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_property_set_emits() {
		// Arrange
		let property = Property::new(0);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let _s = property.changed().subscribe_next(move |v| sink.borrow_mut().push(*v));

		// Act
		property.set(1);
		property.update(|v| *v += 10);

		// Assert
		assert_eq!(property.get(), 11);
		assert_eq!(*seen.borrow(), vec![1, 11]);
	}

	#[rstest]
	#[case(5, false)]
	#[case(6, true)]
	fn test_property_set_if_changed(#[case] value: i32, #[case] expected: bool) {
		let property = Property::new(5);
		assert_eq!(property.set_if_changed(value), expected);
		assert_eq!(property.get(), value);
	}

	#[rstest]
	fn test_property_reentrant_read_in_observer() {
		let property = Property::new(String::from("a"));
		let observed = Rc::new(RefCell::new(String::new()));
		let reader = property.clone();
		let sink = observed.clone();
		let _s = property
			.changed()
			.subscribe_next(move |_| *sink.borrow_mut() = reader.get());

		property.set("b".to_string());

		assert_eq!(*observed.borrow(), "b");
	}

	#[rstest]
	fn test_closures_may_touch_the_same_property() {
		// Arrange
		let property = Property::new(1);
		let inner = property.clone();

		// Act
		let doubled = property.with(|v| {
			inner.set(*v * 2);
			inner.get()
		});
		property.update(|v| *v += inner.get());

		// Assert
		assert_eq!(doubled, 2);
		assert_eq!(property.get(), 4);
	}
}
