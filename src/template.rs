//! Fixed defensive layouts.
//!
//! A layout is authored as groups of `(role, [coordinates])`. Flattening the
//! groups in order (group by group, coordinate by coordinate) gives the
//! `DefenseTemplate`, whose order is the build priority: earlier entries are
//! bought first whenever cores are short.

use crate::config::UnitRole;
use crate::location::Location;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// A single intended placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub role: UnitRole,
    pub location: Location,
}

/// An immutable, priority-ordered build list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseTemplate {
    entries: Vec<TemplateEntry>,
}

impl DefenseTemplate {
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter()
    }
}

/// Flatten `(role, coordinates)` groups into a build list.
pub fn make_build_list<G, C>(groups: G) -> DefenseTemplate
where
    G: IntoIterator<Item = (UnitRole, C)>,
    C: IntoIterator<Item = [u8; 2]>,
{
    let entries = groups
        .into_iter()
        .flat_map(|(role, coords)| {
            coords.into_iter().map(move |xy| TemplateEntry {
                role,
                location: Location::from(xy),
            })
        })
        .collect();

    DefenseTemplate { entries }
}

/// Named layouts in the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseLayout {
    /// Corners sealed with filters, destructor pairs across the middle.
    EdgeAttack,
    /// Funnel towards the centre backed by destructors.
    InvertedTriangle,
    /// Funnel built in alternating filter/destructor tiers.
    TieredTriangle,
    /// A full filter screen with a destructor row behind it.
    FilterLine,
}

impl DefenseLayout {
    pub const ALL: [DefenseLayout; 4] = [
        DefenseLayout::EdgeAttack,
        DefenseLayout::InvertedTriangle,
        DefenseLayout::TieredTriangle,
        DefenseLayout::FilterLine,
    ];
}

/// All layouts, built once per match.
#[derive(Clone, Debug)]
pub struct DefenseLibrary {
    templates: FnvHashMap<DefenseLayout, DefenseTemplate>,
}

impl Default for DefenseLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl DefenseLibrary {
    pub fn new() -> Self {
        let templates = DefenseLayout::ALL
            .iter()
            .map(|&layout| (layout, build_layout(layout)))
            .collect();
        DefenseLibrary { templates }
    }

    pub fn get(&self, layout: DefenseLayout) -> Option<&DefenseTemplate> {
        self.templates.get(&layout)
    }
}

fn build_layout(layout: DefenseLayout) -> DefenseTemplate {
    use UnitRole::{Destructor, Filter};

    match layout {
        DefenseLayout::EdgeAttack => make_build_list(vec![
            (
                Filter,
                vec![
                    [0, 13], [1, 13], [2, 13], [3, 12], [4, 11], [5, 10],
                    [22, 10], [23, 11], [24, 12], [25, 13], [26, 13], [27, 13],
                ],
            ),
            (Destructor, vec![[10, 9], [17, 9], [9, 9], [18, 9]]),
            (
                Filter,
                vec![
                    [11, 10], [16, 10], [7, 10], [20, 10], [6, 10],
                    [21, 10], [12, 10], [15, 10], [8, 10], [19, 10],
                ],
            ),
            (
                Destructor,
                vec![[13, 9], [14, 9], [12, 9], [15, 9], [11, 9], [16, 9]],
            ),
        ]),
        DefenseLayout::InvertedTriangle => make_build_list(vec![
            (
                Filter,
                vec![
                    [0, 13], [1, 12], [2, 11], [3, 10], [4, 9], [5, 8],
                    [27, 13], [26, 12], [25, 11], [24, 10], [23, 9], [22, 8],
                ],
            ),
            (Destructor, vec![[10, 7], [17, 7], [12, 9], [15, 9]]),
            (
                Destructor,
                vec![[10, 9], [17, 9], [11, 10], [16, 10], [7, 10], [20, 10]],
            ),
            (Destructor, vec![[9, 8], [18, 8], [8, 9], [19, 9]]),
            (
                Destructor,
                vec![
                    [8, 9], [19, 9], [9, 8], [18, 8], [13, 9],
                    [14, 9], [11, 6], [16, 6], [6, 11], [21, 11],
                ],
            ),
        ]),
        DefenseLayout::TieredTriangle => make_build_list(vec![
            (
                Filter,
                vec![
                    [0, 13], [1, 12], [2, 11], [3, 10], [4, 9], [5, 8],
                    [27, 13], [26, 12], [25, 11], [24, 10], [23, 9], [22, 8],
                ],
            ),
            (Destructor, vec![[11, 7], [16, 7], [13, 9], [14, 9]]),
            (Filter, vec![[12, 10], [15, 10]]),
            (Destructor, vec![[11, 9], [16, 9]]),
            (Filter, vec![[10, 10], [17, 10]]),
            (Destructor, vec![[9, 9], [18, 9]]),
            (Filter, vec![[8, 10], [19, 10]]),
            (Destructor, vec![[9, 9], [18, 9], [10, 8], [17, 8]]),
            (Filter, vec![[11, 10], [16, 10], [9, 10], [18, 10]]),
        ]),
        DefenseLayout::FilterLine => make_build_list(vec![
            (Filter, (0..26).map(|i| [27 - i, 13]).collect::<Vec<_>>()),
            (Destructor, (0..24).map(|i| [26 - i, 12]).collect::<Vec<_>>()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_groups_in_order() {
        let template = make_build_list(vec![
            (UnitRole::Filter, vec![[0, 13], [1, 13]]),
            (UnitRole::Destructor, vec![[5, 10]]),
        ]);
        let flat: Vec<(UnitRole, Location)> =
            template.iter().map(|e| (e.role, e.location)).collect();
        assert_eq!(
            flat,
            vec![
                (UnitRole::Filter, Location::from_coords(0, 13)),
                (UnitRole::Filter, Location::from_coords(1, 13)),
                (UnitRole::Destructor, Location::from_coords(5, 10)),
            ]
        );
    }

    #[test]
    fn empty_groups_contribute_nothing() {
        let template = make_build_list(vec![
            (UnitRole::Filter, vec![]),
            (UnitRole::Destructor, vec![[5, 10]]),
        ]);
        assert_eq!(template.len(), 1);
    }

    #[test]
    fn library_layouts_stay_on_our_half() {
        let library = DefenseLibrary::new();
        for layout in DefenseLayout::ALL {
            let template = library.get(layout).unwrap();
            assert!(!template.is_empty());
            for entry in template.iter() {
                assert!(entry.location.is_in_arena(), "{:?} {}", layout, entry.location);
                assert!(entry.location.y() < 14, "{:?} {}", layout, entry.location);
                assert!(entry.role.is_stationary());
            }
        }
    }

    #[test]
    fn filter_line_sizes() {
        let library = DefenseLibrary::new();
        let template = library.get(DefenseLayout::FilterLine).unwrap();
        assert_eq!(template.len(), 50);
        assert_eq!(template.entries()[0].location, Location::from_coords(27, 13));
        assert_eq!(template.entries()[26].location, Location::from_coords(26, 12));
    }
}
