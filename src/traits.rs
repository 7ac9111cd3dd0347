//! Priority extraction for heap elements
//!
//! The [`Heap`](crate::heap::Heap) orders its elements by a comparable
//! priority. For bare numbers the priority is the value itself; for
//! structured records it is one numeric field, chosen at runtime by a
//! field-name selector (the heap's "priority key").
//!
//! The [`Keyed`] trait is the seam between the two: the heap hands every
//! comparison through `priority(key)`, and the element type decides what
//! the selector means. Numeric types ignore the selector entirely.
//!
//! # Example
//!
//! ```rust
//! use dskit::Keyed;
//!
//! struct Job {
//!     urgency: u32,
//!     cost: u32,
//! }
//!
//! impl Keyed for Job {
//!     type Priority = u32;
//!
//!     fn priority(&self, key: Option<&str>) -> u32 {
//!         match key {
//!             Some("cost") => self.cost,
//!             _ => self.urgency,
//!         }
//!     }
//! }
//! ```

/// Extracts the comparable priority from a heap element.
///
/// `key` is the heap's current field-name selector. Implementations for
/// record types dispatch on it and pick a default field when it is `None`
/// or unrecognized; implementations for bare numeric types ignore it.
pub trait Keyed {
    /// The comparable priority type.
    type Priority: Ord + Copy;

    /// Returns the priority this element is ordered by under `key`.
    fn priority(&self, key: Option<&str>) -> Self::Priority;
}

macro_rules! impl_keyed_for_numeric {
    ($($t:ty),*) => {
        $(
            impl Keyed for $t {
                type Priority = $t;

                fn priority(&self, _key: Option<&str>) -> $t {
                    *self
                }
            }
        )*
    };
}

impl_keyed_for_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_their_own_priority() {
        assert_eq!(5i32.priority(None), 5);
        assert_eq!(5i32.priority(Some("anything")), 5);
        assert_eq!(7usize.priority(None), 7);
    }

    #[test]
    fn records_dispatch_on_the_selector() {
        struct Edge {
            weight: i64,
            length: i64,
        }

        impl Keyed for Edge {
            type Priority = i64;

            fn priority(&self, key: Option<&str>) -> i64 {
                match key {
                    Some("length") => self.length,
                    _ => self.weight,
                }
            }
        }

        let e = Edge { weight: 3, length: 40 };
        assert_eq!(e.priority(None), 3);
        assert_eq!(e.priority(Some("length")), 40);
        assert_eq!(e.priority(Some("unknown")), 3);
    }
}
