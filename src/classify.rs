//! Shape classification for container objects.
//!
//! Objects are duck-typed by the member names they carry, following the ROOT
//! naming convention preserved by bundle producers: a graph stores its
//! coordinates as `fX`/`fY`, a graph-with-errors additionally stores
//! `fEX`/`fEY`, and anything else is treated as a tree of arbitrary named
//! branches. The predicates run in fixed priority order so the most specific
//! match always wins.

use std::fmt;

/// The extraction strategy assigned to a leaf object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Coordinate pairs: fields `fX`, `fY`.
    Graph,
    /// Coordinate pairs with per-point uncertainties: fields `fX`, `fY`,
    /// `fEX`, `fEY`.
    GraphErrors,
    /// Generic tabular record stream with arbitrary named fields.
    Tree,
}

impl ObjectKind {
    /// The class-style label shown in listings.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Graph => "TGraph",
            ObjectKind::GraphErrors => "TGraphErrors",
            ObjectKind::Tree => "TTree",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const GRAPH_FIELDS: [&str; 2] = ["fX", "fY"];
const GRAPH_ERRORS_FIELDS: [&str; 4] = ["fX", "fY", "fEX", "fEY"];

/// Classify an object by its field names.
///
/// Total over every input, including an empty field list (a tree with zero
/// branches, which extraction subsequently rejects). Evaluation order is
/// fixed: the errors shape is tested before the plain pairs shape, so a
/// field set satisfying both is always classified [`ObjectKind::GraphErrors`].
pub fn classify(fields: &[String]) -> ObjectKind {
    let has_all = |required: &[&str]| {
        required
            .iter()
            .all(|needed| fields.iter().any(|field| field == needed))
    };

    if has_all(&GRAPH_ERRORS_FIELDS) {
        ObjectKind::GraphErrors
    } else if has_all(&GRAPH_FIELDS) {
        ObjectKind::Graph
    } else {
        ObjectKind::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn exact_graph_fields() {
        assert_eq!(classify(&fields(&["fX", "fY"])), ObjectKind::Graph);
    }

    #[test]
    fn errors_shape_wins_over_plain_pairs() {
        assert_eq!(
            classify(&fields(&["fX", "fY", "fEX", "fEY"])),
            ObjectKind::GraphErrors
        );
    }

    #[test]
    fn partial_error_fields_fall_back_to_graph() {
        assert_eq!(classify(&fields(&["fX", "fY", "fEX"])), ObjectKind::Graph);
    }

    #[test]
    fn arbitrary_branches_are_a_tree() {
        assert_eq!(classify(&fields(&["px", "py", "pz"])), ObjectKind::Tree);
        assert_eq!(classify(&fields(&["fX"])), ObjectKind::Tree);
    }

    #[test]
    fn empty_field_set_is_a_tree() {
        assert_eq!(classify(&[]), ObjectKind::Tree);
    }

    #[test]
    fn labels() {
        assert_eq!(ObjectKind::Graph.to_string(), "TGraph");
        assert_eq!(ObjectKind::GraphErrors.to_string(), "TGraphErrors");
        assert_eq!(ObjectKind::Tree.to_string(), "TTree");
    }

    proptest! {
        // Extra fields never downgrade a match.
        #[test]
        fn graph_errors_superset_stays_graph_errors(
            extra in proptest::collection::vec("[a-z]{1,8}", 0..6)
        ) {
            let mut all = fields(&["fX", "fY", "fEX", "fEY"]);
            all.extend(extra);
            prop_assert_eq!(classify(&all), ObjectKind::GraphErrors);
        }

        #[test]
        fn graph_superset_without_error_fields_stays_graph(
            extra in proptest::collection::vec("[a-z]{1,8}", 0..6)
        ) {
            let mut all = fields(&["fX", "fY"]);
            all.extend(extra);
            prop_assert_eq!(classify(&all), ObjectKind::Graph);
        }
    }
}
