// Copyright 2019 The Druid Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Traits for handling value types.

use std::rc::Rc;

/// Cheap "is this the same value" comparison.
///
/// This is the only comparison the reconciler performs on attribute values: it never looks inside
/// shared values, two `Rc`s are the same only if they point to the same allocation.
pub trait Data: Clone + 'static {
    fn same(&self, other: &Self) -> bool;
}

/// An impl of `Data` suitable for simple types.
///
/// The `same` method is implemented with equality, so the type should
/// implement `Eq` at least.
macro_rules! impl_data_simple {
    ($($t:ty),*) => {
        $(
            impl Data for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_data_simple!(i8, i16, i32, i64, i128, isize);
impl_data_simple!(u8, u16, u32, u64, u128, usize);
impl_data_simple!(char, bool, String);

impl<T: ?Sized + 'static> Data for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl Data for () {
    fn same(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(feature = "imbl")]
impl<K, V, S> Data for imbl::HashMap<K, V, S>
where
    K: Clone + std::hash::Hash + Eq + 'static,
    V: Clone + 'static,
    S: std::hash::BuildHasher + 'static,
{
    fn same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
