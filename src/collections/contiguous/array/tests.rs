#![cfg(test)]

use std::cell::Cell;
use std::hash::{BuildHasher, RandomState};
use std::iter;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::util::alloc::{CountedDrop, ZeroSizedType};
use crate::util::panic::assert_panics;

/// A [`CountedDrop`] with a default, so that it can be stored in a DynamicArray. Default values
/// aren't counted.
#[derive(Debug, Clone, Default)]
struct Tracked(Option<CountedDrop>);

thread_local! {
    static DEFAULTS_LEFT: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// A value whose [`Default`] implementation panics once the current thread's allowance, set with
/// [`allow_defaults`], runs out.
#[derive(Debug, Clone, PartialEq)]
struct Fragile(u32);

impl Default for Fragile {
    fn default() -> Self {
        let left = DEFAULTS_LEFT.get();
        if left == 0 { panic!("No more default values allowed!"); }
        DEFAULTS_LEFT.set(left - 1);
        Fragile(0)
    }
}

fn allow_defaults(count: usize) {
    DEFAULTS_LEFT.set(count);
}

#[test]
fn test_growth_increment() {
    let mut arr = DynamicArray::with_cap_and_growth(2, 3);
    arr.push("v0");
    arr.push("v1");
    assert_eq!(arr.cap(), 2, "Shouldn't grow while there is room.");

    arr.push("v2");
    assert_eq!(arr.cap(), 5, "The third push should grow by the increment.");

    arr.push("v3");
    assert_eq!(arr.cap(), 5);
    assert_eq!(arr.len(), 4);
    assert_eq!(arr.get(3), &"v3");
    assert_eq!(&*arr, &["v0", "v1", "v2", "v3"]);
}

#[test]
fn test_push_from_zero_capacity() {
    let mut arr = DynamicArray::with_cap_and_growth(0, 1);
    for i in 0..100_u32 {
        arr.push(i * 3);
        assert_eq!(arr.cap(), arr.len(), "A growth increment of 1 should grow one slot at a time.");
    }

    assert_eq!(arr.len(), 100);
    for i in 0..100 {
        assert_eq!(arr.get(i), &(i as u32 * 3), "Values should survive every reallocation.");
    }
}

#[test]
fn test_zero_growth() {
    let mut arr = DynamicArray::with_cap_and_growth(2, 0);
    assert_eq!(arr.try_push(1), Ok(()));
    assert_eq!(arr.try_push(2), Ok(()));

    assert_eq!(arr.try_push(3), Err(CapacityExhausted { cap: 2 }));
    assert_eq!(
        arr.try_push(3),
        Err(CapacityExhausted { cap: 2 }),
        "Repeating a failing push should fail identically."
    );
    assert_eq!(
        arr.try_insert_at(0, 3),
        Err(IndexOrCapExhausted::CapacityExhausted(CapacityExhausted { cap: 2 }))
    );
    assert_eq!(arr.try_append_all(&DynamicArray::from_iter([3])), Err(CapacityExhausted { cap: 2 }));
    assert_eq!(&*arr, &[1, 2], "Failed additions shouldn't modify the array.");
    assert_eq!(arr.cap(), 2);

    assert_panics!({
        let mut arr = DynamicArray::with_cap_and_growth(0, 0);
        arr.push(1);
    });

    arr.set_growth(1);
    arr.push(3);
    assert_eq!(arr.cap(), 3, "Changing the increment should allow growth again.");

    let mut arr = DynamicArray::with_cap_and_growth(3, 0);
    arr.push(1);
    arr.append_all(&DynamicArray::from_iter([2, 3]));
    assert_eq!(&*arr, &[1, 2, 3], "Appending should succeed while the items still fit.");
}

#[test]
fn test_out_of_range() {
    let mut arr = DynamicArray::from_iter([10, 20, 30]);

    assert_eq!(arr.try_get(3), Err(IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(arr.try_get_mut(7), Err(IndexOutOfRange { index: 7, len: 3 }));
    assert_eq!(arr.try_set(3, 0), Err(IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(arr.try_remove_at(3), Err(IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(
        arr.try_insert_at(4, 0),
        Err(IndexOrCapExhausted::IndexOutOfRange(IndexOutOfRange { index: 4, len: 3 }))
    );
    assert!(arr.try_insert_at(usize::MAX, 0).is_err_and(|e| e.is_index_out_of_range()));
    assert_eq!(&*arr, &[10, 20, 30], "Failed operations shouldn't modify the array.");
    assert_eq!(arr.cap(), 3);

    assert_panics!({ DynamicArray::from_iter([1]).get(1); });
    assert_panics!({ DynamicArray::from_iter([1]).remove_at(1); });
    assert_panics!({ DynamicArray::from_iter([1]).insert_at(2, 0); });
    assert_panics!({ DynamicArray::from_iter([1])[1] = 0; });
    assert_panics!({ DynamicArray::<u8>::new().set(0, 1); });

    assert_eq!(
        IndexOutOfRange { index: 3, len: 3 }.to_string(),
        "Index 3 out of range for collection with 3 elements!"
    );
}

#[test]
fn test_get_and_set() {
    let mut arr = DynamicArray::from_iter([1, 2, 3]);

    assert_eq!(arr.set(0, 10), 1);
    *arr.get_mut(1) = 20;
    arr[2] += 27;

    assert_eq!(arr[0], 10);
    assert_eq!(arr.try_get(1), Ok(&20));
    assert_eq!(arr.get(2), &30);
    assert_eq!(arr.upper_bound(), Some(2));
    assert_eq!(DynamicArray::<u8>::new().upper_bound(), None);
}

#[test]
fn test_insert_and_remove() {
    let mut arr = DynamicArray::with_cap_and_growth(2, 2);
    arr.insert_at(0, 'b');
    arr.insert_at(0, 'a');
    arr.insert_at(2, 'd');
    arr.insert_at(2, 'c');
    assert_eq!(&*arr, &['a', 'b', 'c', 'd']);
    assert_eq!(arr.cap(), 4);

    assert_eq!(arr.remove_at(0), 'a');
    assert_eq!(arr.remove_at(2), 'd');
    assert_eq!(&*arr, &['b', 'c']);
    assert_eq!(arr.cap(), 4, "Removal shouldn't shrink the buffer.");
    assert_eq!(&arr.buf[2..], &['\0', '\0'], "Vacated slots should hold the default value.");
}

#[test]
fn test_insert_remove_inverse_randomized() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let len = rng.gen_range(0..20);
        let mut arr: DynamicArray<i64> = (0..len).map(|_| rng.gen_range(-100..100)).collect();
        arr.set_growth(rng.gen_range(1..4));
        let before = arr.clone();

        let index = rng.gen_range(0..=arr.len());
        arr.insert_at(index, 1000);
        assert_eq!(arr[index], 1000);
        assert_eq!(arr.remove_at(index), 1000);
        assert_eq!(arr, before, "Inserting then removing at one index should restore the array.");
    }
}

#[test]
fn test_append_all() {
    let mut arr = DynamicArray::with_cap_and_growth(1, 2);
    arr.push(String::from("a"));
    let other = DynamicArray::from_iter(["b", "c", "d"].map(String::from));

    arr.append_all(&other);
    assert_eq!(&*arr, &["a", "b", "c", "d"]);
    assert_eq!(arr.cap(), 5, "Appending should grow by the increment, one element at a time.");
    assert_eq!(&*other, &["b", "c", "d"], "The source shouldn't be modified.");

    arr.append_all(&DynamicArray::new());
    assert_eq!(arr.len(), 4);
}

#[test]
fn test_set_explicit_size() {
    let mut arr = DynamicArray::from_iter([1_u8, 2, 3]);
    assert_eq!(arr.cap(), 3);

    arr.set_explicit_size(6, 4);
    assert_eq!(arr.cap(), 6, "Growing past capacity should allocate exactly the new size.");
    assert_eq!(arr.growth(), 4);
    assert_eq!(&*arr, &[1, 2, 3, 0, 0, 0], "Exposed slots should hold the default value.");

    arr.set_explicit_size(2, 4);
    assert_eq!(arr.cap(), 6, "Shrinking the length shouldn't shrink the buffer.");
    assert_eq!(&*arr, &[1, 2]);

    arr.set_explicit_size(4, 1);
    assert_eq!(&*arr, &[1, 2, 0, 0], "Slots removed earlier shouldn't reappear.");

    arr.push(9);
    assert_eq!(arr.cap(), 6);
    arr.push(9);
    arr.push(9);
    assert_eq!(arr.cap(), 7, "The new increment should apply to future growth.");

    let counter = CountedDrop::new(0);
    let mut arr: DynamicArray<_> =
        iter::repeat_with(|| Tracked(Some(counter.clone()))).take(4).collect();
    arr.set_explicit_size(1, 1);
    assert_eq!(counter.count(), 3, "Truncated elements should be dropped.");
}

#[test]
fn test_shrink_to_fit() {
    let mut arr = DynamicArray::with_cap(10);
    arr.extend(0..4);
    arr.shrink_to_fit();
    assert_eq!(arr.cap(), 4);
    assert_eq!(&*arr, &[0, 1, 2, 3]);

    arr.shrink_to_fit();
    assert_eq!(arr.cap(), 4);

    let mut arr = DynamicArray::<u8>::with_cap(3);
    arr.shrink_to_fit();
    assert_eq!(arr.cap(), 0);
    arr.push(1);
    assert_eq!(arr.cap(), 1, "An array shrunk to nothing should still grow.");
}

#[test]
fn test_clear() {
    let counter = CountedDrop::new(0);
    let mut arr = DynamicArray::with_cap_and_growth(8, 2);
    arr.extend(iter::repeat_with(|| Tracked(Some(counter.clone()))).take(5));

    arr.clear();
    assert_eq!(counter.count(), 5, "Clearing should drop every element.");
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.cap(), 8, "Clearing should preserve the capacity.");
    assert_eq!(arr.growth(), 2);

    arr.push(Tracked::default());
    assert_eq!(arr.len(), 1);
}

#[test]
fn test_drop() {
    let counter = CountedDrop::new(0);
    let mut arr = DynamicArray::with_cap_and_growth(2, 5);
    arr.extend(iter::repeat_with(|| Tracked(Some(counter.clone()))).take(10));
    assert_eq!(counter.count(), 0, "Growing shouldn't drop any live element.");

    drop(arr.remove_at(3));
    assert_eq!(counter.count(), 1);

    drop(arr);
    assert_eq!(counter.count(), 10, "10 elements should have been dropped.");
}

#[test]
fn test_clone_is_deep() {
    let mut arr = DynamicArray::with_cap_and_growth(5, 3);
    arr.extend([1, 2, 3]);
    let mut copy = arr.clone();

    assert_eq!(copy, arr);
    assert_eq!(copy.cap(), 5);
    assert_eq!(copy.growth(), 3);
    assert_ne!(copy.buf.ptr, arr.buf.ptr, "A clone should own a separate buffer.");

    copy[0] = 100;
    copy.push(4);
    assert_eq!(&*arr, &[1, 2, 3], "Mutating the clone shouldn't affect the source.");
}

#[test]
fn test_zst_support() {
    let mut arr = DynamicArray::with_cap_and_growth(0, 4);
    for _ in 0..10 {
        arr.push(ZeroSizedType);
    }
    assert_eq!(arr.len(), 10);
    assert_eq!(arr.cap(), 12);
    assert_eq!(arr.remove_at(5), ZeroSizedType);
    arr.shrink_to_fit();
    assert_eq!(arr.cap(), 9);
}

#[test]
fn test_buffer_realloc() {
    let mut buf = Buffer::<usize>::repeat_default(5);
    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = i;
    }

    let old_ptr = buf.ptr;
    buf.realloc_with_default(5);
    assert_eq!(buf.ptr, old_ptr, "Reallocating to the same size shouldn't move the buffer.");

    buf.realloc_with_default(8);
    assert_eq!(&*buf, &[0, 1, 2, 3, 4, 0, 0, 0]);

    buf.realloc_with_default(2);
    assert_eq!(&*buf, &[0, 1]);

    buf.realloc_with_default(0);
    assert_eq!(buf.size(), 0);

    assert_panics!({
        let mut buf = Buffer::<u64>::repeat_default(1);
        buf.realloc_with_default(isize::MAX as usize);
    });

    let counter = CountedDrop::new(0);
    let mut buf = Buffer::from_fn(10, |_| Tracked(Some(counter.clone())));
    buf.realloc_with_default(4);
    assert_eq!(counter.count(), 6, "Shrinking should drop the elements that no longer fit.");
    drop(buf);
    assert_eq!(counter.count(), 10);
}

#[test]
fn test_buffer_panicking_fill() {
    let counter = CountedDrop::new(0);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        Buffer::from_fn(5, |i| {
            if i == 3 { panic!("element 3 failed"); }
            counter.clone()
        })
    }));

    assert!(result.is_err());
    assert_eq!(counter.count(), 3, "Values created before the panic should be dropped.");
}

#[test]
fn test_equality_hash_and_format() {
    let arr = DynamicArray::from_iter(0_usize..5);
    let mut other = DynamicArray::with_cap_and_growth(9, 2);
    other.extend(0_usize..5);

    assert_eq!(arr, other, "Equality shouldn't depend on capacity.");

    let state = RandomState::new();
    assert_eq!(state.hash_one(&arr), state.hash_one(&other));
    assert_eq!(
        state.hash_one(&arr),
        state.hash_one([0_usize, 1, 2, 3, 4].as_slice()),
        "Borrow hash equality should be upheld."
    );

    assert_eq!(format!("{arr}"), "[0, 1, 2, 3, 4]");
    assert_eq!(
        format!("{:?}", DynamicArray::from_iter([1, 2])),
        "DynamicArray { contents: [1, 2], len: 2, cap: 2, growth: 1 }"
    );
}

#[test]
fn test_panicking_default_during_growth() {
    allow_defaults(usize::MAX);
    let mut arr = DynamicArray::with_cap_and_growth(2, 3);
    arr.push(Fragile(1));
    arr.push(Fragile(2));

    allow_defaults(1);
    assert_panics!({ arr.push(Fragile(3)); });
    assert_panics!({ arr.insert_at(0, Fragile(3)); });
    assert_panics!({ arr.set_explicit_size(4, 1); });

    assert_eq!(arr.len(), 2, "A failed growth shouldn't change the length.");
    assert_eq!(arr.cap(), 2, "A failed growth shouldn't change the capacity.");
    assert_eq!(arr.growth(), 3);
    assert_eq!(&*arr, &[Fragile(1), Fragile(2)], "A failed growth shouldn't lose any elements.");

    allow_defaults(usize::MAX);
    arr.push(Fragile(3));
    assert_eq!(arr.cap(), 5);
    assert_eq!(&*arr, &[Fragile(1), Fragile(2), Fragile(3)]);
}

#[test]
fn test_panicking_default_during_truncation() {
    allow_defaults(usize::MAX);
    let mut arr = DynamicArray::from_iter([1, 2, 3, 4].map(Fragile));

    allow_defaults(2);
    assert_panics!({ arr.set_explicit_size(1, 5); });

    assert_eq!(arr.len(), 4);
    assert_eq!(arr.growth(), DEFAULT_GROWTH);
    assert_eq!(
        &*arr,
        &[Fragile(1), Fragile(2), Fragile(3), Fragile(4)],
        "A failed truncation shouldn't overwrite any elements."
    );

    allow_defaults(usize::MAX);
    arr.set_explicit_size(1, 5);
    assert_eq!(&*arr, &[Fragile(1)]);
    assert_eq!(&arr.buf[1..], &[Fragile(0), Fragile(0), Fragile(0)]);
}
