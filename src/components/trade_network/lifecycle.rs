use std::cell::Cell;
use std::rc::Rc;

/// Shared counter that invalidates scheduled frame callbacks.
///
/// Every new graph advances the counter; a callback holding an older
/// [`Generation`] must not touch the state it was scheduled for.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
	current: Rc<Cell<u64>>,
}

/// Ticket handed to one animation loop.
#[derive(Clone, Debug)]
pub struct Generation {
	id: u64,
	current: Rc<Cell<u64>>,
}

impl GenerationCounter {
	/// Start a new generation, invalidating every earlier ticket.
	pub fn advance(&self) -> Generation {
		let id = self.current.get() + 1;
		self.current.set(id);
		Generation {
			id,
			current: self.current.clone(),
		}
	}

	/// Invalidate every ticket without issuing a new one.
	pub fn cancel(&self) {
		self.current.set(self.current.get() + 1);
	}
}

impl Generation {
	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn is_current(&self) -> bool {
		self.current.get() == self.id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn advancing_invalidates_older_tickets() {
		let counter = GenerationCounter::default();
		let first = counter.advance();
		assert!(first.is_current());

		let second = counter.advance();
		assert!(!first.is_current());
		assert!(second.is_current());
		assert!(second.id() > first.id());
	}

	#[test]
	fn cancel_invalidates_everything() {
		let counter = GenerationCounter::default();
		let ticket = counter.advance();
		let clone = counter.clone();
		clone.cancel();
		assert!(!ticket.is_current());
		assert!(!ticket.clone().is_current());
	}
}
