use std::alloc::{self, Layout};
use std::cmp;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::util::error::CapacityOverflow;
use crate::util::result::ResultExtension;

/// A heap allocation of `size` slots, every one of which holds an initialized `T`. This is the
/// storage behind [`DynamicArray`](super::DynamicArray): the array decides how many of the slots
/// are live, while the Buffer only cares that all of them are valid values.
///
/// Resizing always moves the existing values into a fresh allocation and releases the old one.
pub(crate) struct Buffer<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Buffer<T> {
    /// Creates a Buffer with no slots, without allocating.
    pub const fn empty() -> Buffer<T> {
        Buffer {
            ptr: NonNull::dangling(),
            size: 0,
            _phantom: PhantomData,
        }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    /// Creates a Buffer of `size` slots, initializing each one with the value returned by `f` for
    /// its index.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`]. If `f` panics, the values it has
    /// already produced are dropped and the allocation is released.
    pub fn from_fn(size: usize, f: impl FnMut(usize) -> T) -> Buffer<T> {
        let mut fill = Fill::alloc(size);
        fill.fill_with(f);
        fill.finish()
    }

    pub fn into_parts(self) -> (NonNull<T>, usize) {
        let ret = (self.ptr, self.size);
        mem::forget(self);
        ret
    }

    /// A helper function to create a [`Layout`] for use during allocation, containing `size` number
    /// of elements of type `T`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub(crate) fn make_layout(size: usize) -> Layout {
        Layout::array::<T>(size).map_err(|_| CapacityOverflow).throw()
    }

    /// A helper function to create a [`NonNull`] for the provided [`Layout`]. Returns a dangling
    /// pointer for a zero-sized layout.
    ///
    /// # Errors
    /// In the event of an allocation error, this method calls [`alloc::handle_alloc_error`] as
    /// recommended, to avoid new allocations rather than panicking.
    pub(crate) fn make_ptr(layout: Layout) -> NonNull<T> {
        if layout.size() == 0 {
            NonNull::dangling()
        } else {
            NonNull::new(
                // SAFETY: Zero-sized layouts have been guarded against.
                unsafe { alloc::alloc(layout).cast() }
            ).unwrap_or_else(|| alloc::handle_alloc_error(layout))
        }
    }

    /// Releases the memory behind `ptr` without dropping any values.
    ///
    /// # Safety
    /// `ptr` must have been produced by [`Buffer::make_ptr`] with the layout for `size` elements,
    /// and must not be used again.
    pub(crate) unsafe fn release(ptr: NonNull<T>, size: usize) {
        let layout = Buffer::<T>::make_layout(size);

        if layout.size() != 0 {
            // SAFETY: ptr was allocated in the global allocator with this same layout. Zero-sized
            // layouts aren't allocated and are guarded against deallocation.
            unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T: Default> Buffer<T> {
    /// Creates a new Buffer by repeating the default value of `T` `size` times.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn repeat_default(size: usize) -> Buffer<T> {
        Buffer::from_fn(size, |_| T::default())
    }

    /// Moves every value of self into a new allocation with `new_size` slots, filling any extra
    /// slots with the default value of `T`. When shrinking, the values that no longer fit are
    /// dropped. The old allocation is released.
    ///
    /// If `T::default()` panics, self is left untouched.
    ///
    /// # Panics
    /// Panics if the memory layout of the new allocation would have a size that exceeds
    /// [`isize::MAX`]. (`new_size * size_of::<T>() > isize::MAX`)
    pub fn realloc_with_default(&mut self, new_size: usize) {
        if new_size == self.size { return; }

        // Everything that can panic happens before self is taken apart.
        let extra: Buffer<T> = if new_size > self.size {
            Buffer::repeat_default(new_size - self.size)
        } else {
            Buffer::empty()
        };
        let mut fill = Fill::alloc(new_size);

        let (old_ptr, old_size) = mem::replace(self, Buffer::empty()).into_parts();
        let (extra_ptr, extra_size) = extra.into_parts();
        let kept = cmp::min(old_size, new_size);

        // SAFETY: The old allocation holds old_size >= kept initialized values and extra holds
        // extra_size values, with kept + extra_size == new_size. The new allocation is distinct
        // from both (or dangling for zero bytes) and has room for new_size values.
        unsafe {
            ptr::copy_nonoverlapping(old_ptr.as_ptr().cast_const(), fill.ptr.as_ptr(), kept);
            ptr::copy_nonoverlapping(
                extra_ptr.as_ptr().cast_const(),
                fill.ptr.add(kept).as_ptr(),
                extra_size,
            );
        }
        fill.init = kept + extra_size;
        *self = fill.finish();

        // SAFETY: Every value of extra and the first kept values of the old allocation were moved
        // into self above. The rest are still initialized and nothing else refers to them. Neither
        // allocation is used again.
        unsafe {
            Buffer::release(extra_ptr, extra_size);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                old_ptr.add(kept).as_ptr(),
                old_size - kept,
            ));
            Buffer::release(old_ptr, old_size);
        }
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        // SAFETY: Every slot is initialized, and self is never used after this.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.size));
            Buffer::release(self.ptr, self.size);
        }
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The allocation uses Layout::array(size) and is therefore valid and properly
        // aligned for size values, all of which are initialized. The borrow checker prevents
        // mutation throughout the lifetime of the slice.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

impl<T> DerefMut for Buffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, and self is mutably borrowed for the lifetime of the slice.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Buffer::from_fn(self.size, |index| self[index].clone())
    }
}

// SAFETY: A Buffer uniquely owns its allocation, so it is Send when T: Send.
unsafe impl<T: Send> Send for Buffer<T> {}
// SAFETY: Buffer has no interior mutability, so it is Sync when T: Sync.
unsafe impl<T: Sync> Sync for Buffer<T> {}

/// An allocation whose first `init` slots hold values. Dropping it drops those values and releases
/// the allocation, which keeps a panicking element constructor from leaking or corrupting memory.
pub(crate) struct Fill<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) init: usize,
}

impl<T> Fill<T> {
    pub fn alloc(size: usize) -> Fill<T> {
        Fill {
            ptr: Buffer::<T>::make_ptr(Buffer::<T>::make_layout(size)),
            size,
            init: 0,
        }
    }

    /// Initializes every remaining slot with the value returned by `f` for its index.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize) -> T) {
        while self.init < self.size {
            let value = f(self.init);
            // SAFETY: init < size, so the slot is within the allocation, and it hasn't been
            // written yet.
            unsafe { self.ptr.add(self.init).write(value); }
            self.init += 1;
        }
    }

    pub fn finish(self) -> Buffer<T> {
        debug_assert_eq!(self.init, self.size);
        let buf = Buffer {
            ptr: self.ptr,
            size: self.size,
            _phantom: PhantomData,
        };
        mem::forget(self);
        buf
    }
}

impl<T> Drop for Fill<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly the first init slots are initialized, and the allocation came from
        // make_ptr with the layout for size elements.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.init));
            Buffer::release(self.ptr, self.size);
        }
    }
}
