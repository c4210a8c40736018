use apimap_core::access::{Node, PointerResolver, Value};
use apimap_core::config::{Lexicon, ServiceMeta};
use apimap_core::model::{Operation, Resource, Schema, Service};
use apimap_core::naming::{name_variants, to_resource_name};
use apimap_core::openapi::OpenApiService;
use serde_json::json;

fn users_and_posts() -> OpenApiService {
    let ok = |schema: serde_json::Value| {
        json!({"200": {"description": "OK", "content": {"application/json": {"schema": schema}}}})
    };
    let doc = json!({
        "openapi": "3.0.0",
        "info": {"title": "Scenario", "version": "1"},
        "servers": [{"url": "https://example.com"}],
        "paths": {
            "/users": {
                "get": {"responses": ok(json!({
                    "type": "object",
                    "properties": {
                        "total": {"type": "integer"},
                        "users": {"type": "array", "items": {"type": "object", "properties": {"login": {"type": "string"}}}}
                    }
                }))},
                "post": {"responses": ok(json!({"type": "object"}))}
            },
            "/users/{id}": {"get": {"responses": ok(json!({"type": "object"}))}},
            "/users/{id}/posts": {"get": {"responses": ok(json!({"type": "array"}))}},
            "/users/{id}/posts/{id}": {"post": {"responses": ok(json!({"type": "object"}))}}
        }
    });
    OpenApiService::from_node("scenario", Node::from(doc), ServiceMeta::default()).unwrap()
}

#[test]
fn users_and_posts_form_two_resources() {
    let service = users_and_posts();
    let names: Vec<String> = service.resources().iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names, vec!["user", "userPost"]);

    for resource in service.resources() {
        assert_eq!(resource.collection_urls().len(), 1, "{}", resource.name());
        assert_eq!(resource.item_urls().len(), 1, "{}", resource.name());
    }

    let post = service.resource("userPost").unwrap();
    assert_eq!(post.parent().unwrap().name(), "user");
}

#[test]
fn post_is_create_on_collection_and_apply_on_item() {
    let service = users_and_posts();
    let user = service.resource("user").unwrap();
    assert!(user.operation("create").is_ok());

    let post = service.resource("userPost").unwrap();
    let apply = post.operation("apply").unwrap();
    assert_eq!(apply.url(), "https://example.com/users/{id}/posts/{id}");
}

#[test]
fn listing_output_is_the_item_schema() {
    let service = users_and_posts();
    let user = service.resource("user").unwrap();
    let list = user.operation("list").unwrap();
    let output = list.output().unwrap();
    assert!(output.property("login").is_ok());
    assert!(output.property("total").is_err());
}

#[test]
fn loading_twice_is_deterministic() {
    let render = |service: &OpenApiService| -> Vec<String> {
        service
            .resources()
            .iter()
            .flat_map(|r| {
                r.operations()
                    .iter()
                    .map(|op| format!("{}.{} {} {}", r.name(), op.name(), op.method(), op.url()))
                    .collect::<Vec<_>>()
            })
            .collect()
    };
    assert_eq!(render(&users_and_posts()), render(&users_and_posts()));
}

#[test]
fn reference_cycle_round_trips() {
    let root = Node::from(json!({
        "definitions": {
            "A": {"name": "a", "friend": {"$ref": "#/definitions/B"}},
            "B": {"name": "b", "back": {"$ref": "#/definitions/A"}}
        }
    }));
    let doc = Value::new(root.clone()).with_resolver(PointerResolver::new(root));

    let through_cycle = doc.get(["definitions", "A", "friend", "back", "name"]);
    let literal = doc.get(["definitions", "A", "name"]);
    assert_eq!(through_cycle.string(), literal.string());
    assert_eq!(through_cycle.string().as_deref(), Some("a"));

    assert!(doc.get(["definitions", "missing", "friend", "name"]).is_absent());
}

#[test]
fn derived_names_are_stable() {
    let lexicon = Lexicon::default();
    for path in ["/users/{id}/posts", "/v2/ssh_keys", "/orgs/{org}/members"] {
        let name = to_resource_name(path, &lexicon);
        assert_eq!(to_resource_name(&name, &lexicon), name, "{path}");
    }
}

#[test]
fn name_variants_snapshot() {
    insta::assert_snapshot!(name_variants("userPost").join("\n"), @r"
    UserPost
    UserPosts
    user-post
    user-posts
    userPost
    userPosts
    user_post
    user_posts
    ");
}
