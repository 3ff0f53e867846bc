#![allow(unused_crate_dependencies)]

use dbdash_metadata::{IntrospectionSchema, MetaObject};
use dbdash_query_builder::{ExplicitSelection, IncludeSpec, OperationKind, Preset, QueryBuilder, SelectionSpec};

fn fixtures() -> (MetaObject, IntrospectionSchema) {
    let meta = MetaObject::from_json(include_str!("fixtures/blog_meta.json")).unwrap();
    let schema = IntrospectionSchema::from_json(include_str!("fixtures/blog_schema.json")).unwrap();

    (meta, schema)
}

fn print(model: &str, spec: SelectionSpec, kind: OperationKind) -> String {
    let (meta, schema) = fixtures();

    let document = QueryBuilder::new(&meta, &schema)
        .entity(model)
        .unwrap()
        .select(&spec)
        .build(kind)
        .unwrap()
        .print();

    if let Err(error) = cynic_parser::parse_executable_document(&document.query) {
        unreachable!("{} is not a valid document: {error:?}\n{}", document.query_name, document.query);
    }

    document.query
}

#[test]
fn list_with_default_selection() {
    let query = print("User", SelectionSpec::default(), OperationKind::List);

    insta::assert_snapshot!(query, @r###"
    query getUsersQuery($first: Int, $offset: Int, $after: Cursor, $orderBy: [UsersOrderBy!], $condition: UserCondition, $filter: UserFilter) {
      users(first: $first, offset: $offset, after: $after, orderBy: $orderBy, condition: $condition, filter: $filter) {
        totalCount
        pageInfo {
          hasNextPage
          hasPreviousPage
          startCursor
          endCursor
        }
        nodes {
          id
          name
          email
          createdAt
          metadata
        }
      }
    }
    "###);
}

#[test]
fn list_over_edges_with_structured_fields_and_relations() {
    let spec = ExplicitSelection::new(["id", "title", "location", "area", "shapes", "readingTime", "tags"])
        .include("author", IncludeSpec::select(["name"]))
        .include("comments", IncludeSpec::All(true));

    let query = print("Post", spec.into(), OperationKind::List);

    insta::assert_snapshot!(query, @r###"
    query getPostsQuery($first: Int, $offset: Int, $after: Cursor, $orderBy: [PostsOrderBy!], $filter: PostFilter) {
      posts(first: $first, offset: $offset, after: $after, orderBy: $orderBy, filter: $filter) {
        totalCount
        pageInfo {
          hasNextPage
          hasPreviousPage
          startCursor
          endCursor
        }
        edges {
          cursor
          node {
            id
            title
            location {
              x
              y
            }
            area {
              geojson
            }
            shapes {
              geometries {
                ... on GeometryPoint {
                  x
                  y
                }
              }
            }
            readingTime {
              years
              months
              days
              hours
              minutes
              seconds
            }
            tags
            author {
              name
            }
            comments(first: 20) {
              totalCount
              nodes {
                id
                body
                waypoints
              }
            }
          }
        }
      }
    }
    "###);
}

#[test]
fn single_row() {
    let query = print("User", Preset::Minimal.into(), OperationKind::Single);

    insta::assert_snapshot!(query, @r###"
    query getUserQuery($id: UUID!) {
      user(id: $id) {
        id
        name
        email
      }
    }
    "###);
}

#[test]
fn count_only_forwards_filters() {
    insta::assert_snapshot!(print("User", Preset::Minimal.into(), OperationKind::Count), @r###"
    query getUsersCountQuery($condition: UserCondition, $filter: UserFilter) {
      users(condition: $condition, filter: $filter) {
        totalCount
      }
    }
    "###);

    insta::assert_snapshot!(print("Comment", Preset::Minimal.into(), OperationKind::Count), @r###"
    query getCommentsCountQuery($filter: CommentFilter) {
      comments(filter: $filter) {
        totalCount
      }
    }
    "###);
}

#[test]
fn create_mutation() {
    let query = print("User", SelectionSpec::select(["id", "name"]), OperationKind::Create);

    insta::assert_snapshot!(query, @r###"
    mutation createUserMutation($user: UserInput!) {
      createUser(input: {user: $user}) {
        user {
          id
          name
        }
      }
    }
    "###);
}

#[test]
fn update_mutation_uses_the_canonical_variant() {
    let query = print("User", SelectionSpec::select(["id", "name"]), OperationKind::Update);

    insta::assert_snapshot!(query, @r###"
    mutation updateUserMutation($id: UUID!, $patch: UserPatch!) {
      updateUser(input: {id: $id, patch: $patch}) {
        user {
          id
          name
        }
      }
    }
    "###);
}

#[test]
fn delete_mutation() {
    let query = print("User", SelectionSpec::default(), OperationKind::Delete);

    insta::assert_snapshot!(query, @r###"
    mutation deleteUserMutation($id: UUID!) {
      deleteUser(input: {id: $id}) {
        clientMutationId
      }
    }
    "###);
}

#[test]
fn mutation_without_described_input_fields() {
    let query = print("Post", Preset::Minimal.into(), OperationKind::Create);

    insta::assert_snapshot!(query, @r###"
    mutation createPostMutation($input: CreatePostInput!) {
      createPost(input: $input) {
        post {
          id
          title
          location {
            x
            y
          }
        }
      }
    }
    "###);
}

#[test]
fn printing_is_deterministic() {
    let (meta, schema) = fixtures();
    let builder = QueryBuilder::new(&meta, &schema);
    let spec = SelectionSpec::Preset(Preset::Full);

    for kind in [OperationKind::List, OperationKind::Single, OperationKind::Count] {
        let first = builder.entity("Post").unwrap().select(&spec).build(kind).unwrap().print();
        let second = builder.entity("Post").unwrap().select(&spec).build(kind).unwrap().print();

        assert_eq!(first.query_name, second.query_name);
        assert_eq!(first.query, second.query);
    }
}

#[test]
fn the_printed_document_keeps_its_ast() {
    let (meta, schema) = fixtures();

    let printed = QueryBuilder::new(&meta, &schema)
        .entity("Post")
        .unwrap()
        .list()
        .unwrap()
        .print();

    assert_eq!(printed.query_name, "getPostsQuery");
    assert_eq!(printed.root_field(), Some("posts"));
    assert_eq!(printed.ast.to_string(), printed.query);
}
