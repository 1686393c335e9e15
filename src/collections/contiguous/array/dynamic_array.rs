use std::borrow::{Borrow, BorrowMut};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};

use log::{debug, warn};

use super::Buffer;
#[doc(inline)]
pub use crate::util::error::{
    CapacityExhausted, CapacityOverflow, IndexOrCapExhausted, IndexOutOfRange,
};
use crate::util::result::ResultExtension;

/// The growth increment used when none is provided.
pub const DEFAULT_GROWTH: usize = 1;

/// A contiguous, randomly accessible sequence whose capacity grows by a fixed, caller-chosen
/// increment whenever an element is added to a full buffer.
///
/// Unlike [`Vec`], capacity never changes behind the caller's back: it is exactly the initial
/// capacity, plus the growth increment for every time the buffer filled up, unless it is changed
/// explicitly with [`set_explicit_size`](DynamicArray::set_explicit_size),
/// [`shrink_to_fit`](DynamicArray::shrink_to_fit) or by cloning.
///
/// Every slot of the buffer holds a valid `T`. Slots past the length hold `T::default()`, which is
/// why most operations that can allocate require `T: Default`.
///
/// # Growth Increment of Zero
/// An array with a growth increment of zero can't grow. Adding an element to a full array in that
/// state fails with [`CapacityExhausted`] (or panics with its message, for the non-`try_` forms)
/// and leaves the array untouched.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DynamicArray.
/// - `i`: The index of the item in question.
/// - `m`: The number of items in the second DynamicArray.
///
/// | Method | Complexity |
/// |-|-|
/// | `get/set` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `insert_at` | `O(n-i)`*, `O(n)` |
/// | `remove_at` | `O(n-i)` |
/// | `append_all` | `O(m)`*, `O(m*(n+m))` |
/// | `set_explicit_size` | `O(1)`**, `O(n)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `clear` | `O(n)` |
///
/// \* If the DynamicArray has to grow, every live element is moved to the new buffer.
///
/// \** If the DynamicArray already has enough capacity for the new size.
pub struct DynamicArray<T> {
    pub(crate) buf: Buffer<T>,
    pub(crate) len: usize,
    pub(crate) growth: usize,
}

impl<T> DynamicArray<T> {
    /// Returns the number of live elements in the DynamicArray.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the DynamicArray contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the underlying buffer.
    pub const fn cap(&self) -> usize {
        self.buf.size()
    }

    /// Returns the number of slots added whenever the DynamicArray grows.
    pub const fn growth(&self) -> usize {
        self.growth
    }

    /// Changes the number of slots added whenever the DynamicArray grows.
    pub const fn set_growth(&mut self, growth: usize) {
        self.growth = growth;
    }

    /// Returns the index of the last element, or [`None`] if the DynamicArray is empty.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// assert_eq!(arr.upper_bound(), None);
    /// arr.push('a');
    /// arr.push('b');
    /// assert_eq!(arr.upper_bound(), Some(1));
    /// ```
    pub const fn upper_bound(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Returns a reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`Index`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the DynamicArray.
    pub fn get(&self, index: usize) -> &T {
        self.try_get(index).throw()
    }

    /// Returns a reference to the element at the provided `index`, returning an [`Err`] on a
    /// failure rather than panicking.
    pub fn try_get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.check_index(index)?;
        Ok(&self.buf[index])
    }

    /// Returns a mutable reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`IndexMut`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the DynamicArray.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.try_get_mut(index).throw()
    }

    /// Returns a mutable reference to the element at the provided `index`, returning an [`Err`] on
    /// a failure rather than panicking.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        self.check_index(index)?;
        Ok(&mut self.buf[index])
    }

    /// Replaces the element at the provided `index` with `value`, returning the old value.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the DynamicArray.
    pub fn set(&mut self, index: usize, value: T) -> T {
        self.try_set(index, value).throw()
    }

    /// Replaces the element at the provided `index` with `value`, returning the old value, or an
    /// [`Err`] if `index` is out of bounds. On failure, `value` is dropped and the DynamicArray is
    /// unchanged.
    pub fn try_set(&mut self, index: usize, value: T) -> Result<T, IndexOutOfRange> {
        Ok(mem::replace(self.try_get_mut(index)?, value))
    }

    /// Checks that the provided index refers to a live element.
    pub(crate) const fn check_index(&self, index: usize) -> Result<(), IndexOutOfRange> {
        if index < self.len {
            Ok(())
        } else {
            Err(IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }
}

impl<T: Default> DynamicArray<T> {
    /// Creates a new DynamicArray with length and capacity 0, and a growth increment of
    /// [`DEFAULT_GROWTH`]. No memory is allocated until the capacity changes.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let arr: DynamicArray<u8> = DynamicArray::new();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.cap(), 0);
    /// assert_eq!(arr.growth(), 1);
    /// ```
    pub fn new() -> DynamicArray<T> {
        DynamicArray::with_cap_and_growth(0, DEFAULT_GROWTH)
    }

    /// Creates a new DynamicArray with capacity exactly equal to `cap` and a growth increment of
    /// [`DEFAULT_GROWTH`].
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn with_cap(cap: usize) -> DynamicArray<T> {
        DynamicArray::with_cap_and_growth(cap, DEFAULT_GROWTH)
    }

    /// Creates a new DynamicArray with capacity exactly equal to `cap`, which adds `growth` slots
    /// whenever it runs out of room.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::with_cap_and_growth(2, 3);
    /// arr.extend(["v0", "v1"]);
    /// assert_eq!(arr.cap(), 2);
    ///
    /// arr.push("v2");
    /// assert_eq!(arr.cap(), 5);
    /// ```
    pub fn with_cap_and_growth(cap: usize, growth: usize) -> DynamicArray<T> {
        DynamicArray {
            buf: Buffer::repeat_default(cap),
            len: 0,
            growth,
        }
    }

    /// Adds the provided value to the end of the DynamicArray, growing the buffer by the growth
    /// increment if it is full.
    ///
    /// # Panics
    /// Panics if the DynamicArray is full with a growth increment of zero, or if the memory layout
    /// of the grown buffer would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// for i in 0..=5 {
    ///     arr.push(i);
    /// }
    /// assert_eq!(&*arr, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_push(value).throw()
    }

    /// Adds the provided value to the end of the DynamicArray, returning an [`Err`] if the array is
    /// full with a growth increment of zero. On failure, `value` is dropped and the DynamicArray is
    /// unchanged.
    ///
    /// # Panics
    /// Panics if the memory layout of the grown buffer would have a size that exceeds
    /// [`isize::MAX`].
    pub fn try_push(&mut self, value: T) -> Result<(), CapacityExhausted> {
        self.grow()?;
        self.buf[self.len] = value;
        self.len += 1;
        Ok(())
    }

    /// Inserts the provided value at the given index, moving all following elements one slot
    /// towards the end. An `index` equal to the length appends the value.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if the DynamicArray is full with a growth
    /// increment of zero.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from_iter(0..3);
    /// arr.insert_at(1, 100);
    /// arr.insert_at(1, 200);
    /// arr.insert_at(5, 300);
    /// assert_eq!(&*arr, &[0, 200, 100, 1, 2, 300]);
    /// ```
    pub fn insert_at(&mut self, index: usize, value: T) {
        self.try_insert_at(index, value).throw()
    }

    /// Inserts the provided value at the given index, returning an [`Err`] rather than panicking
    /// if `index` is greater than the length or the DynamicArray can't grow. On failure, `value`
    /// is dropped and the DynamicArray is unchanged.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), IndexOrCapExhausted> {
        if index > self.len {
            return Err(IndexOutOfRange {
                index,
                len: self.len,
            }.into());
        }

        self.grow()?;

        let mut prev = value;
        for i in index..=self.len {
            prev = mem::replace(&mut self.buf[i], prev);
        }

        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at the provided index, moving all following elements one
    /// slot towards the start. The capacity is unchanged.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the DynamicArray.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr: DynamicArray<_> = "Hello world!".chars().collect();
    /// assert_eq!(arr.remove_at(1), 'e');
    /// assert_eq!(arr.remove_at(4), ' ');
    /// assert_eq!(arr, "Hlloworld!".chars().collect());
    /// ```
    pub fn remove_at(&mut self, index: usize) -> T {
        self.try_remove_at(index).throw()
    }

    /// Removes and returns the element at the provided index, returning an [`Err`] rather than
    /// panicking if `index` is out of bounds.
    pub fn try_remove_at(&mut self, index: usize) -> Result<T, IndexOutOfRange> {
        self.check_index(index)?;

        // The slot vacated at the end goes back to holding a default value.
        let mut next = T::default();
        for i in (index..self.len).rev() {
            next = mem::replace(&mut self.buf[i], next);
        }

        self.len -= 1;
        Ok(next)
    }

    /// Sets the length of the DynamicArray to exactly `new_len` and its growth increment to
    /// `growth`. If `new_len` exceeds the capacity, the buffer is reallocated to exactly `new_len`
    /// slots.
    ///
    /// Elements exposed by increasing the length hold `T::default()`. Elements removed by
    /// decreasing the length are dropped and replaced with `T::default()`. If `T::default()`
    /// panics, the DynamicArray is unchanged.
    ///
    /// # Panics
    /// Panics if the memory layout of the new buffer would have a size that exceeds
    /// [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from_iter([1_u8, 2]);
    /// arr.set_explicit_size(4, 2);
    /// assert_eq!(&*arr, &[1, 2, 0, 0]);
    /// assert_eq!(arr.cap(), 4);
    /// assert_eq!(arr.growth(), 2);
    /// ```
    pub fn set_explicit_size(&mut self, new_len: usize, growth: usize) {
        // Holds the truncated values until the array is consistent again.
        let mut truncated: Buffer<T> = Buffer::empty();

        if new_len > self.cap() {
            self.realloc(new_len);
        } else if new_len < self.len {
            truncated = Buffer::repeat_default(self.len - new_len);
            self.buf[new_len..self.len].swap_with_slice(&mut truncated[..]);
        }

        self.len = new_len;
        self.growth = growth;
        drop(truncated);
    }

    /// Shrinks the buffer so that its capacity is equal to the length.
    pub fn shrink_to_fit(&mut self) {
        if self.len < self.cap() {
            self.realloc(self.len);
        }
    }

    /// Drops every element and replaces the buffer with a fresh one of the same capacity.
    pub fn clear(&mut self) {
        debug!("Clearing DynamicArray, reallocating {} slots", self.cap());
        self.buf = Buffer::repeat_default(self.cap());
        self.len = 0;
    }

    /// Ensures that there is room for one more element, growing by the growth increment if the
    /// buffer is full.
    ///
    /// # Panics
    /// Panics if the memory layout of the grown buffer would have a size that exceeds
    /// [`isize::MAX`].
    pub(crate) fn grow(&mut self) -> Result<(), CapacityExhausted> {
        if self.len < self.cap() { return Ok(()); }

        if self.growth == 0 {
            warn!("DynamicArray is full at capacity {} and can't grow", self.cap());
            return Err(CapacityExhausted { cap: self.cap() });
        }

        let new_cap = self.cap().checked_add(self.growth).ok_or(CapacityOverflow).throw();
        self.realloc(new_cap);
        Ok(())
    }

    /// Reallocates the buffer with exactly `new_cap` slots.
    ///
    /// # Panics
    /// Panics if the memory layout of the new buffer would have a size that exceeds
    /// [`isize::MAX`].
    pub(crate) fn realloc(&mut self, new_cap: usize) {
        debug!("Reallocating DynamicArray from {} to {} slots", self.cap(), new_cap);
        self.buf.realloc_with_default(new_cap);
    }
}

impl<T: Default + Clone> DynamicArray<T> {
    /// Adds a clone of every element of `other` to the end of self, in order, growing the same way
    /// as [`push`](DynamicArray::push).
    ///
    /// # Panics
    /// Panics if self doesn't have room for all of `other` and has a growth increment of zero.
    ///
    /// # Examples
    /// ```
    /// # use container_kit::collections::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from_iter([1, 2]);
    /// arr.append_all(&DynamicArray::from_iter([3, 4]));
    /// assert_eq!(&*arr, &[1, 2, 3, 4]);
    /// ```
    pub fn append_all(&mut self, other: &DynamicArray<T>) {
        self.try_append_all(other).throw()
    }

    /// Adds a clone of every element of `other` to the end of self, returning an [`Err`] without
    /// adding anything if self doesn't have room for all of them and has a growth increment of
    /// zero.
    pub fn try_append_all(&mut self, other: &DynamicArray<T>) -> Result<(), CapacityExhausted> {
        if self.growth == 0 && other.len > self.cap() - self.len {
            warn!("DynamicArray is full at capacity {} and can't grow", self.cap());
            return Err(CapacityExhausted { cap: self.cap() });
        }

        for value in other.iter() {
            self.try_push(value.clone())?;
        }
        Ok(())
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T: Default> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Default> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        let mut arr = DynamicArray::with_cap(iter.size_hint().0);
        arr.extend(iter);
        arr
    }
}

impl<T: Default> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf[..self.len]
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf[..self.len]
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.deref()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.deref_mut()
    }
}

impl<T> Borrow<[T]> for DynamicArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_ref()
    }
}

impl<T> BorrowMut<[T]> for DynamicArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Creates a deep copy with the same elements, capacity and growth increment.
    fn clone(&self) -> Self {
        DynamicArray {
            buf: self.buf.clone(),
            len: self.len,
            growth: self.growth,
        }
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let contents: &[T] = self;
        f.debug_struct("DynamicArray")
            .field("contents", &contents)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .field("growth", &self.growth)
            .finish()
    }
}

impl<T: Debug> Display for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
