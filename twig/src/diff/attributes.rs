use crate::{
    attributes::Attributes,
    patch::{AttrOp, AttrPatch},
};
use twig_common::Data;

/// Computes the attribute edits turning `old` into `new`.
///
/// New or changed entries are written, in the order of `new`, then entries missing from `new` are
/// removed. Handlers are compared by identity. An entry that switches between a plain value and a
/// handler is a single write that also clears the previous form on the live node.
pub(crate) fn diff_attributes(old: &Attributes, new: &Attributes) -> AttrPatch {
    let mut patch = AttrPatch::new();
    for (name, value) in new.iter() {
        match old.get(name) {
            Some(prev) if prev.same(value) => {}
            prev => patch.push(AttrOp::Set {
                name: name.clone(),
                value: value.clone(),
                switched: prev.map_or(false, |prev| prev.is_handler() != value.is_handler()),
            }),
        }
    }
    for (name, value) in old.iter() {
        if !new.contains(name) {
            patch.push(AttrOp::Remove {
                name: name.clone(),
                handler: value.is_handler(),
            });
        }
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttrValue, Handler};
    use twig_common::atom;

    #[test]
    fn update_and_addition() {
        let old: Attributes = [("id", "x"), ("class", "a")].into_iter().collect();
        let new: Attributes = [("id", "x"), ("class", "b"), ("title", "t")].into_iter().collect();
        let patch = diff_attributes(&old, &new);
        let names: Vec<_> = patch
            .ops()
            .iter()
            .map(|op| match op {
                AttrOp::Set { name, .. } => format!("set {}", name),
                AttrOp::Remove { name, .. } => format!("remove {}", name),
            })
            .collect();
        assert_eq!(names, ["set class", "set title"]);
    }

    #[test]
    fn removals() {
        let on_click = Handler::new(|| {});
        let mut old: Attributes = [("id", "x")].into_iter().collect();
        old.insert("click", on_click);
        let new = Attributes::new();
        let patch = diff_attributes(&old, &new);
        assert!(matches!(
            patch.ops(),
            [
                AttrOp::Remove { handler: false, .. },
                AttrOp::Remove { handler: true, .. }
            ]
        ));
    }

    #[test]
    fn handlers_by_identity() {
        let on_click = Handler::new(|| {});
        let mut old = Attributes::new();
        old.insert("click", on_click.clone());
        let mut same = Attributes::new();
        same.insert("click", on_click);
        assert!(diff_attributes(&old, &same).is_empty());

        let mut rebuilt = Attributes::new();
        rebuilt.insert("click", Handler::new(|| {}));
        let patch = diff_attributes(&old, &rebuilt);
        assert!(matches!(
            patch.ops(),
            [AttrOp::Set {
                value: AttrValue::Handler(_),
                switched: false,
                ..
            }]
        ));
    }

    #[test]
    fn value_to_handler() {
        let old: Attributes = [("click", "noop")].into_iter().collect();
        let mut new = Attributes::new();
        new.insert("click", Handler::new(|| {}));
        let patch = diff_attributes(&old, &new);
        assert!(matches!(
            patch.ops(),
            [AttrOp::Set { name, switched: true, .. }] if *name == atom!("click")
        ));
    }

    #[test]
    fn values_compare_strictly() {
        let old: Attributes = [("value", 1i64)].into_iter().collect();
        let new: Attributes = [("value", 1.0f64)].into_iter().collect();
        assert_eq!(diff_attributes(&old, &new).len(), 1);
    }
}
