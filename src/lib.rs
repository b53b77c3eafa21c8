//! Reactive list views
//!
//! A *View* is an accessor interface together with the update protocol (the diff)
//! its observers receive whenever it changes.
//! *Projections* are views derived from other views; they observe their source
//! and keep themselves in sync incrementally, publishing fine-grained diffs
//! of their own.
//!
//! The central projection is the filtered list: it maintains the ascending
//! positions of the matching source elements and translates every source
//! change (reordering, insertion and removal, update in place) into the
//! equivalent change of the filtered list. Projections chain like iterator
//! adapters.
//!
//!# Examples
//!
//! ```
//! use livelist::{buffer::vec::*, view::list::*};
//!
//! let mut buffer = VecBuffer::<i32>::new();
//! buffer.push(3);
//!
//! let projected_port = buffer.get_port()
//!                       .map(|x| x + 10)
//!                       .filter(|x| *x > 10);
//!
//! let projected_view = projected_port.get_view().unwrap();
//!
//! assert_eq!(projected_view.get(&0), Some(13));
//!
//! buffer.push(5);   // maps to 15
//! buffer.push(-9);  // maps to 1, is eliminated by filter
//! buffer.push(1);   // maps to 11
//!
//! assert_eq!(projected_view.to_vec(), vec![13, 15, 11]);
//!
//! buffer.reverse();
//! assert_eq!(projected_view.to_vec(), vec![11, 15, 13]);
//! ```
//!
//! Observers can also collect the changes of a view:
//!
//! ```
//! use livelist::{buffer::vec::*, view::list::*};
//!
//! let mut buffer: VecBuffer<i32> = (1..=5).collect();
//! let evens = buffer.get_port().filtered(|x| x % 2 == 0);
//! let changes = evens.get_port().queue_changes();
//!
//! buffer.remove(1).unwrap();
//! evens.set_predicate(|x| x % 2 != 0);
//!
//! assert_eq!(
//!     changes.drain(),
//!     vec![
//!         ListChange::removed(0, vec![2]),
//!         ListChange::Replaced { from: 0, to: 3, removed: vec![4] },
//!     ]
//! );
//! ```

pub mod view;
pub mod buffer;
pub mod projection;
