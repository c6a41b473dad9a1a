//! Conversion from decoded PBF elements into owned entities.
//!
//! Missing history fields (version, user, timestamp, changeset) default to
//! zero or empty, matching files written without metadata.

use osm_rdf_core::{
    EntityKind, EntityMeta, Location, Member, Node, OsmEntity, Relation, Tags, Timestamp, Way,
};
use osmpbf::{Element, Info, RelMemberType};

pub(super) fn to_entity(element: &Element<'_>) -> OsmEntity {
    match element {
        Element::Node(node) => OsmEntity::Node(Node {
            meta: meta_from_info(node.id(), &node.info()),
            tags: collect_tags(node.tags()),
            location: Some(Location::from_decimicro(
                node.decimicro_lon(),
                node.decimicro_lat(),
            )),
        }),
        Element::DenseNode(node) => {
            let meta = match node.info() {
                Some(info) => EntityMeta {
                    id: node.id(),
                    version: info.version(),
                    user: info.user().map(str::to_owned).unwrap_or_default(),
                    timestamp: Timestamp::from_millis(info.milli_timestamp()),
                    changeset: info.changeset(),
                    deleted: info.deleted(),
                },
                None => EntityMeta::with_id(node.id()),
            };
            OsmEntity::Node(Node {
                meta,
                tags: collect_tags(node.tags()),
                location: Some(Location::from_decimicro(
                    node.decimicro_lon(),
                    node.decimicro_lat(),
                )),
            })
        }
        Element::Way(way) => OsmEntity::Way(Way {
            meta: meta_from_info(way.id(), &way.info()),
            tags: collect_tags(way.tags()),
            node_refs: way.refs().collect(),
        }),
        Element::Relation(relation) => OsmEntity::Relation(Relation {
            meta: meta_from_info(relation.id(), &relation.info()),
            tags: collect_tags(relation.tags()),
            members: relation
                .members()
                .map(|member| Member {
                    kind: member_kind(member.member_type.clone()),
                    id: member.member_id,
                    role: member.role().map(str::to_owned).unwrap_or_default(),
                })
                .collect(),
        }),
    }
}

fn meta_from_info(id: i64, info: &Info<'_>) -> EntityMeta {
    EntityMeta {
        id,
        version: info.version().unwrap_or_default(),
        user: info
            .user()
            .and_then(Result::ok)
            .map(str::to_owned)
            .unwrap_or_default(),
        timestamp: Timestamp::from_millis(info.milli_timestamp().unwrap_or_default()),
        changeset: info.changeset().unwrap_or_default(),
        deleted: info.deleted(),
    }
}

fn collect_tags<'a, T>(tags: T) -> Tags
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    tags.into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

const fn member_kind(member_type: RelMemberType) -> EntityKind {
    match member_type {
        RelMemberType::Node => EntityKind::Node,
        RelMemberType::Way => EntityKind::Way,
        RelMemberType::Relation => EntityKind::Relation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn tags_keep_source_order() {
        let collected = collect_tags([("name", "Ring"), ("created_by", "iD"), ("oneway", "yes")]);
        let keys: Vec<&str> = collected.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["name", "created_by", "oneway"]);
    }

    #[rstest]
    #[case(RelMemberType::Node, EntityKind::Node)]
    #[case(RelMemberType::Way, EntityKind::Way)]
    #[case(RelMemberType::Relation, EntityKind::Relation)]
    fn member_types_map_to_entity_kinds(
        #[case] member_type: RelMemberType,
        #[case] expected: EntityKind,
    ) {
        assert_eq!(member_kind(member_type), expected);
    }
}
