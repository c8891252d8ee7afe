//! Interned names.
//!
//! Tag kinds, attribute names, event names and state keys are all interned. The names listed in
//! `static_atoms.txt` are packed statically and can be written with the [`atom!`](crate::atom)
//! macro; any other string is interned on first use with `Atom::from`.
use crate::Data;

include!(concat!(env!("OUT_DIR"), "/atoms.rs"));

impl Data for Atom {
    fn same(&self, other: &Self) -> bool {
        // interned: comparing atoms compares the packed representation
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::Atom;
    use crate::Data;

    #[test]
    fn static_and_dynamic_atoms_compare_equal() {
        let dynamic = Atom::from("div");
        assert_eq!(atom!("div"), dynamic);
        assert!(atom!("div").same(&dynamic));
        assert_ne!(atom!("div"), atom!("span"));
    }

    #[test]
    fn unknown_names_are_interned() {
        let a = Atom::from(String::from("data-gallery"));
        let b = Atom::from("data-gallery");
        assert!(a.same(&b));
        assert_eq!(&*a, "data-gallery");
    }
}
