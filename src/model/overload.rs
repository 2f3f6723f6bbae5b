//! Overload grouping
//!
//! Grouping is nominal: methods sharing a name form one group regardless of
//! arity or parameter types.

use super::{ClassModel, Method};
use std::collections::HashMap;

/// Methods sharing one name, in physical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadGroup {
    pub name: String,
    /// Indices into `ClassModel::methods`
    pub members: Vec<usize>,
}

impl OverloadGroup {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_overload_set(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partition methods by name. Groups come out in order of first occurrence.
pub fn group_overloads(methods: &[Method]) -> Vec<OverloadGroup> {
    let mut groups: Vec<OverloadGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, method) in methods.iter().enumerate() {
        match index.get(method.name.as_str()) {
            Some(&slot) => groups[slot].members.push(i),
            None => {
                index.insert(method.name.as_str(), groups.len());
                groups.push(OverloadGroup {
                    name: method.name.clone(),
                    members: vec![i],
                });
            }
        }
    }

    groups
}

/// Mark every method whose name occurs more than once. Idempotent.
pub fn annotate_overloads(class: &mut ClassModel) {
    let groups = group_overloads(&class.methods);
    for group in &groups {
        let overloaded = group.is_overload_set();
        for &i in &group.members {
            class.methods[i].is_overloaded = overloaded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_with(names: &[&str]) -> ClassModel {
        let mut class = ClassModel::new("Gen");
        for name in names {
            class.methods.push(Method::new(*name));
        }
        class
    }

    #[test]
    fn test_groups_in_first_occurrence_order() {
        let class = class_with(&["tick", "reset", "tick", "lastOut", "reset", "tick"]);
        let groups = group_overloads(&class.methods);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["tick", "reset", "lastOut"]);
        assert_eq!(groups[0].members, vec![0, 2, 5]);
        assert_eq!(groups[1].members, vec![1, 4]);
        assert_eq!(groups[2].count(), 1);
    }

    #[test]
    fn test_annotate_marks_only_repeated_names() {
        let mut class = class_with(&["tick", "reset", "tick"]);
        annotate_overloads(&mut class);

        let flags: Vec<bool> = class.methods.iter().map(|m| m.is_overloaded).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_annotate_is_idempotent_and_keeps_order() {
        let mut class = class_with(&["b", "a", "b"]);
        annotate_overloads(&mut class);
        let once = class.clone();
        annotate_overloads(&mut class);
        assert_eq!(class, once);

        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_grouping_ignores_signatures() {
        let mut class = class_with(&["set", "set"]);
        class.methods[1]
            .params
            .push(crate::model::Parameter::new("x", "int", false).unwrap());
        let groups = group_overloads(&class.methods);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_overload_set());
    }

    #[test]
    fn test_empty_method_list() {
        assert!(group_overloads(&[]).is_empty());
    }
}
