/// Identity generator bound to a table's key column.
///
/// [`BINDINGS`] is the sole source of table↔generator knowledge; the
/// bootstrap never discovers identity columns from catalog metadata.
/// The list must track the schema embedded in the dump by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub table: &'static str,
    pub column: &'static str,
    pub sequence: &'static str,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} -> {}", self.table, self.column, self.sequence)
    }
}

/// Table for concrete pokemon (height, weight, base experience).
#[rustfmt::skip]
pub const POKEMON:       &str = "pokemon";
/// Table for species records and breeding/capture metadata.
#[rustfmt::skip]
pub const SPECIES:       &str = "pokemon_species";
/// Table for species color lookups.
#[rustfmt::skip]
pub const COLORS:        &str = "pokemon_colors";
/// Table for species body-shape lookups.
#[rustfmt::skip]
pub const SHAPES:        &str = "pokemon_shapes";
/// Table for per-pokemon type slots.
#[rustfmt::skip]
pub const POKEMON_TYPES: &str = "pokemon_types";
/// Table for elemental type definitions.
#[rustfmt::skip]
pub const TYPES:         &str = "types";

/// Every serial generator in the dump's schema, in reconciliation order.
#[rustfmt::skip]
pub const BINDINGS: &[Binding] = &[
    Binding { table: COLORS,        column: "id", sequence: "pokemon_colors_id_seq"  },
    Binding { table: SHAPES,        column: "id", sequence: "pokemon_shapes_id_seq"  },
    Binding { table: TYPES,         column: "id", sequence: "types_id_seq"           },
    Binding { table: SPECIES,       column: "id", sequence: "pokemon_species_id_seq" },
    Binding { table: POKEMON,       column: "id", sequence: "pokemon_id_seq"         },
    Binding { table: POKEMON_TYPES, column: "id", sequence: "pokemon_types_id_seq"   },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn bindings_name_distinct_tables() {
        let tables = BINDINGS.iter().map(|b| b.table).collect::<BTreeSet<_>>();
        assert_eq!(tables.len(), BINDINGS.len());
    }

    #[test]
    fn bindings_name_distinct_sequences() {
        let sequences = BINDINGS.iter().map(|b| b.sequence).collect::<BTreeSet<_>>();
        assert_eq!(sequences.len(), BINDINGS.len());
    }

    #[test]
    fn sequences_follow_serial_convention() {
        for binding in BINDINGS {
            assert_eq!(
                binding.sequence,
                format!("{}_{}_seq", binding.table, binding.column),
                "{}",
                binding
            );
        }
    }
}
