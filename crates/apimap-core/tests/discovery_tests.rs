use apimap_core::access::Node;
use apimap_core::config::ServiceMeta;
use apimap_core::discovery::DiscoveryService;
use apimap_core::model::{HttpMethod, Operation, Orientation, Resource, Schema, Service, plan_request};
use apimap_core::parse;
use serde_json::{Map, Value as Json, json};

const COMPUTE: &str = include_str!("fixtures/compute.json");

fn load(meta: &str) -> DiscoveryService {
    let root = parse::from_json(COMPUTE).unwrap();
    let meta = ServiceMeta::from_yaml("google-compute", meta).unwrap();
    DiscoveryService::from_node("google-compute", root, meta).unwrap()
}

fn names<T: ?Sized>(items: &[Box<T>], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| name(item).to_string()).collect()
}

#[test]
fn service_attributes() {
    let service = load("categories: [cloud]\n");
    assert_eq!(service.title(), "Compute Engine API");
    assert_eq!(service.provider(), "google.com");
    assert_eq!(service.version(), "v1");
    assert_eq!(service.base_url(), "https://compute.googleapis.com/compute/v1/");
    assert_eq!(service.docs_url(), "https://cloud.google.com/compute/");
    assert_eq!(service.security(), vec!["oauth2"]);
    assert_eq!(service.categories(), vec!["cloud"]);
}

#[test]
fn nested_resources_are_named_by_ancestry() {
    let service = load("");
    assert_eq!(
        names(&service.resources(), |r| r.name()),
        vec!["instance", "instanceDisk", "zone"]
    );

    let disk = service.resource("instanceDisk").unwrap();
    assert_eq!(disk.title(), "Disks");
    assert_eq!(disk.parent().expect("disks are nested").name(), "instance");

    let instance = service.resource("instance").unwrap();
    assert!(instance.parent().is_none());
    assert_eq!(names(&instance.subresources(), |r| r.name()), vec!["instanceDisk"]);
}

#[test]
fn resource_urls_come_from_methods() {
    let service = load("");
    let instance = service.resource("instance").unwrap();
    assert_eq!(instance.title(), "Instances");
    assert_eq!(instance.description(), "An Instance resource.");
    assert_eq!(
        instance.collection_urls(),
        vec!["https://compute.googleapis.com/compute/v1/projects/{project}/zones/{zone}/instances"]
    );
    assert_eq!(
        instance.item_urls(),
        vec![
            "https://compute.googleapis.com/compute/v1/projects/{project}/zones/{zone}/instances/{instance}"
        ]
    );

    let disk = service.resource("instanceDisk").unwrap();
    assert!(disk.item_urls().is_empty());
}

#[test]
fn operations_use_declared_names() {
    let service = load("");
    let instance = service.resource("instance").unwrap();
    assert_eq!(
        names(&instance.operations(), |op| op.name()),
        vec!["get", "insert", "list"]
    );

    let list = instance.operation("list").unwrap();
    assert_eq!(list.abs_name(), "list");
    assert_eq!(list.id(), "compute.instances.list");
    assert_eq!(list.method(), HttpMethod::Get);
    assert_eq!(list.description(), "Retrieves the list of instances.");
    assert_eq!(list.scopes(), vec!["https://www.googleapis.com/auth/compute"]);
    assert_eq!(list.security(), vec!["oauth2"]);

    let insert = instance.operation("insert").unwrap();
    assert_eq!(insert.method(), HttpMethod::Post);
}

#[test]
fn parameters_include_globals() {
    let service = load("");
    let instance = service.resource("instance").unwrap();
    let list = instance.operation("list").unwrap();
    let params = list.parameters();
    assert_eq!(
        names(&params, |p| p.name()),
        vec!["maxResults", "project", "zone", "alt", "fields"]
    );
    assert_eq!(params[0].location(), "query");
    assert_eq!(params[0].minimum(), Some(0.0));
    assert!(params[1].required());
    assert!(!params[3].required());
    assert_eq!(params[3].default_value(), "json");
    assert_eq!(params[3].enum_values(), vec!["json"]);
}

#[test]
fn list_output_unwraps_items() {
    let service = load("");
    let instance = service.resource("instance").unwrap();

    let list = instance.operation("list").unwrap();
    let output = list.output().unwrap();
    assert_eq!(names(&output.properties(), |p| p.name()), vec!["disks", "id", "name"]);
    let response = list.response().expect("envelope should be exposed");
    assert!(response.property("nextPageToken").is_ok());

    let get = instance.operation("get").unwrap();
    assert!(get.response().is_none());

    let disks = service.resource("instanceDisk").unwrap();
    let disk_list = disks.operation("list").unwrap();
    let output = disk_list.output().unwrap();
    assert_eq!(names(&output.properties(), |p| p.name()), vec!["boot", "source"]);
}

#[test]
fn bare_array_list_has_no_separate_response() {
    let doc = json!({
        "baseUrl": "https://x.io/",
        "resources": {
            "tags": {"methods": {"list": {
                "id": "x.tags.list",
                "httpMethod": "GET",
                "path": "tags",
                "response": {"type": "array"}
            }}}
        }
    });
    let service = DiscoveryService::from_node("x", Node::from(doc), ServiceMeta::default()).unwrap();
    let tags = service.resource("tag").unwrap();
    let list = tags.operation("list").unwrap();
    assert_eq!(list.output().unwrap().schema_type(), "array");
    assert!(list.response().is_none());
}

#[test]
fn input_requirements_follow_annotations() {
    let service = load("");
    let instance = service.resource("instance").unwrap();
    let insert = instance.operation("insert").unwrap();

    let input = insert.input().unwrap();
    assert_eq!(names(&input.properties(), |p| p.name()), vec!["disks", "name"]);
    assert!(input.property("name").unwrap().required());
    let disks = input.property("disks").unwrap();
    assert_eq!(disks.items().unwrap().property("boot").unwrap().schema_type(), "boolean");

    let output = insert.output().unwrap();
    assert_eq!(output.property("status").unwrap().enum_values(), vec!["PENDING", "RUNNING", "DONE"]);
    assert!(insert.response().is_none());
}

#[test]
fn orientation_follows_patterns() {
    let service = load("");
    assert_eq!(service.resource("instance").unwrap().orientation(), Orientation::Absolute);

    let service = load("relativeContentPaths: ['^projects/']\n");
    let instance = service.resource("instance").unwrap();
    assert_eq!(instance.orientation(), Orientation::Relative);
    assert_eq!(instance.operation("get").unwrap().orientation(), Orientation::Relative);
}

#[test]
fn plan_request_appends_query_parameters() {
    let service = load("");
    let instance = service.resource("instance").unwrap();
    let get = instance.operation("get").unwrap();

    let args: Map<String, Json> = match json!({"project": "p", "zone": "z", "instance": "i", "alt": "json"}) {
        Json::Object(map) => map,
        _ => Map::new(),
    };
    let plan = plan_request(get.as_ref(), &args).unwrap();
    assert_eq!(
        plan.url,
        "https://compute.googleapis.com/compute/v1/projects/p/zones/z/instances/i?alt=json"
    );
    assert_eq!(plan.body, None);
}
