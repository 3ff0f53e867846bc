//! Sub-selections for columns whose wire value is an object rather than a scalar.
//!
//! PostGIS geometries and intervals are exposed as GraphQL object types, so referencing them
//! as a bare field is not a valid selection. Arrays are never expanded: the API exposes arrays
//! of the underlying scalar, not arrays of objects.

use dbdash_metadata::MetaField;

use crate::ast::{leaves, Field, InlineFragment, Selection};

pub const GEOJSON_FIELD: &str = "geojson";
pub const POINT_FIELDS: [&str; 2] = ["x", "y"];
pub const INTERVAL_FIELDS: [&str; 6] = ["years", "months", "days", "hours", "minutes", "seconds"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredKind {
    /// Any geometry, selected through its GeoJSON representation.
    Geometry,
    /// A point, selected through its coordinates.
    Point,
    /// A geometry collection. Only point members are selected, other member shapes come back
    /// as empty objects.
    GeometryCollection { point_type: String },
    Interval,
}

/// Classifies a column, `None` for anything selected as a plain scalar.
pub fn structured_kind(field: &MetaField) -> Option<StructuredKind> {
    let field_type = field.field_type();

    if field_type.is_array {
        return None;
    }

    let pg_type = field_type.pg_type().map(str::to_ascii_lowercase);

    if pg_type.as_deref() == Some("interval") || field_type.gql_type == "Interval" {
        return Some(StructuredKind::Interval);
    }

    let family = match pg_type.as_deref() {
        Some("geometry") => "Geometry",
        Some("geography") => "Geography",
        _ if field_type.gql_type.starts_with("Geometry") => "Geometry",
        _ if field_type.gql_type.starts_with("Geography") => "Geography",
        _ => return None,
    };

    let subtype = field_type
        .subtype
        .as_deref()
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            field_type
                .gql_type
                .strip_prefix(family)
                .map(str::to_ascii_lowercase)
        });

    let kind = match subtype.as_deref() {
        Some("point") => StructuredKind::Point,
        Some("geometrycollection") => StructuredKind::GeometryCollection {
            point_type: format!("{family}Point"),
        },
        _ => StructuredKind::Geometry,
    };

    Some(kind)
}

/// The selection node for a column: a bare field for scalars, a field with the matching
/// sub-selection for structured values.
pub fn expand(field: &MetaField) -> Field {
    let node = Field::new(field.name());

    let Some(kind) = structured_kind(field) else {
        return node;
    };

    node.with_selection_set(sub_selection(&kind))
}

fn sub_selection(kind: &StructuredKind) -> Vec<Selection> {
    match kind {
        StructuredKind::Geometry => leaves([GEOJSON_FIELD]),
        StructuredKind::Point => leaves(POINT_FIELDS),
        StructuredKind::GeometryCollection { point_type } => {
            let point = InlineFragment {
                type_condition: point_type.clone(),
                selection_set: leaves(POINT_FIELDS),
            };

            vec![Field::new("geometries").with_selection_set(vec![point.into()]).into()]
        }
        StructuredKind::Interval => leaves(INTERVAL_FIELDS),
    }
}

#[cfg(test)]
mod tests {
    use dbdash_metadata::FieldType;

    use super::*;

    fn field_names(selection_set: &[Selection]) -> Vec<&str> {
        selection_set
            .iter()
            .map(|selection| match selection {
                Selection::Field(field) => field.name.as_str(),
                Selection::InlineFragment(fragment) => fragment.type_condition.as_str(),
            })
            .collect()
    }

    #[test]
    fn point_selects_exactly_its_coordinates() {
        let field = MetaField::new(
            "location",
            FieldType::scalar("GeometryPoint", "geometry").with_subtype("Point"),
        );

        let node = expand(&field);
        assert_eq!(node.name, "location");
        assert_eq!(field_names(&node.selection_set), vec!["x", "y"]);
    }

    #[test]
    fn interval_selects_exactly_six_components() {
        let field = MetaField::new("readingTime", FieldType::scalar("Interval", "interval"));

        let node = expand(&field);
        assert_eq!(
            field_names(&node.selection_set),
            vec!["years", "months", "days", "hours", "minutes", "seconds"]
        );
    }

    #[test]
    fn other_geometries_select_geojson() {
        let field = MetaField::new(
            "area",
            FieldType::scalar("GeometryPolygon", "geometry").with_subtype("Polygon"),
        );

        assert_eq!(structured_kind(&field), Some(StructuredKind::Geometry));
        assert_eq!(field_names(&expand(&field).selection_set), vec!["geojson"]);
    }

    #[test]
    fn collections_discriminate_point_members() {
        let field = MetaField::new(
            "shapes",
            FieldType::scalar("GeographyGeometryCollection", "geography").with_subtype("GeometryCollection"),
        );

        let node = expand(&field);
        let [Selection::Field(geometries)] = node.selection_set.as_slice() else {
            unreachable!("expected a single geometries field: {node:?}");
        };
        assert_eq!(geometries.name, "geometries");

        let [Selection::InlineFragment(point)] = geometries.selection_set.as_slice() else {
            unreachable!("expected a single inline fragment: {geometries:?}");
        };
        assert_eq!(point.type_condition, "GeographyPoint");
        assert_eq!(field_names(&point.selection_set), vec!["x", "y"]);
    }

    #[test]
    fn subtype_falls_back_to_the_graphql_type_name() {
        let field = MetaField::new("location", FieldType::scalar("GeometryPoint", "geometry"));
        assert_eq!(structured_kind(&field), Some(StructuredKind::Point));
    }

    #[test]
    fn arrays_are_never_expanded() {
        let points = MetaField::new(
            "waypoints",
            FieldType::scalar("GeometryPoint", "geometry")
                .with_subtype("Point")
                .into_array(),
        );
        let intervals = MetaField::new("durations", FieldType::scalar("Interval", "interval").into_array());

        assert_eq!(structured_kind(&points), None);
        assert!(expand(&points).selection_set.is_empty());
        assert!(expand(&intervals).selection_set.is_empty());
    }

    #[test]
    fn scalars_are_leaves() {
        let field = MetaField::new("title", FieldType::scalar("String", "text"));
        assert_eq!(expand(&field), Field::new("title"));
    }
}
